//! # Events Module
//!
//! Event-driven progress reporting for the pipeline.
//!
//! ## Design
//! The core library emits events through a channel, allowing any UI
//! (CLI, GUI, logs) to subscribe and display progress without the
//! pipeline knowing who is listening.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! // In a separate thread, listen for events
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         match event {
//!             Event::Crawl(CrawlEvent::FileFound { path }) => println!("found {path:?}"),
//!             Event::Hash(HashEvent::FileHashed { path, .. }) => println!("hashed {path:?}"),
//!             _ => {}
//!         }
//!     }
//! });
//!
//! // Run the pipeline with the sender
//! pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
