//! `rally classify <message>` – show how a raw error is classified.

use rally_core::classify::classify_message;

pub fn run_classify(message: &str, context: Option<&str>) {
    let e = classify_message(message, context);
    println!("kind:    {}", e.kind());
    println!("title:   {}", e.kind().title());
    println!("message: {}", e.message());
}
