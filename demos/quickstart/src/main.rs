//! Quickstart example
//!
//! Demonstrates weir's fluent fetch-and-dispatch pattern against a public
//! JSON endpoint.

// Example-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

use weir::prelude::*;

/// A post from the JSONPlaceholder demo API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
}

#[tokio::main]
async fn main() -> weir::Result<()> {
    // GET a post and decode it into a typed record
    Fetch::new("https://jsonplaceholder.typicode.com/posts/1")
        .when_status(404, |_| {
            eprintln!("post not found");
            false
        })?
        .on_json(|post: Post| println!("#{}: {}", post.id, post.title))
        .on_error(ErrorKind::Transport, |err| eprintln!("network problem: {err}"))
        .dispatch()
        .await;

    // POST a JSON body and inspect the echoed response dynamically
    Fetch::new("https://jsonplaceholder.typicode.com/posts")
        .via_post()
        .with_json_body(&Post {
            id: 0,
            title: "hello".to_string(),
            body: "from weir".to_string(),
        })?
        .on_json_value(|value| println!("created post id {}", value["id"]))
        .on_error(ErrorKind::Any, |err| eprintln!("request failed: {err}"))
        .dispatch()
        .await;

    Ok(())
}
