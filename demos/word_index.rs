//! Index a text file and hammer it with concurrent readers and writers.
//!
//! ```text
//! RUST_LOG=shareable_tree=debug cargo run --example word_index -- book.txt
//! ```

use rand::prelude::*;
use shareable_tree::{Config, ShareableTree, SortedCounts};
use std::sync::Arc;
use std::thread;
use tracing_subscriber::EnvFilter;

const NUM_READERS: usize = 37;
const NUM_WRITERS: usize = 11;

fn main() -> shareable_tree::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::default();
    let counts = match std::env::args().nth(1) {
        Some(path) => SortedCounts::from_path(path, &config)?,
        None => SortedCounts::from_words(
            "I am afraid Watson that I shall have to go said Holmes".split_whitespace(),
            &config,
        )?,
    };
    println!("{} distinct words, {} total", counts.len(), counts.total());

    let tree = Arc::new(ShareableTree::from_counts_with_config(counts, config));
    println!("{}", tree.dump());
    println!("height: {}", tree.height());
    println!("search Holmes: {:?}", tree.search("Holmes")?);

    tree.insert("Morty")?;
    tree.rebalance();
    println!("after insert + rebalance, height: {}", tree.height());

    // Shuffled mix of readers and writers, all sharing the same tree.
    let mut roles: Vec<usize> = (0..NUM_READERS + NUM_WRITERS).collect();
    roles.shuffle(&mut thread_rng());
    let handles: Vec<_> = roles
        .into_iter()
        .map(|role| {
            let tree = Arc::clone(&tree);
            thread::spawn(move || -> shareable_tree::Result<()> {
                if role < NUM_READERS {
                    match role % 4 {
                        0 => {
                            tree.search("Whobba")?;
                        }
                        1 => {
                            tree.search("Pickle")?;
                        }
                        2 => {
                            tree.dump();
                        }
                        _ => {
                            tree.height();
                        }
                    }
                } else {
                    match role % 4 {
                        0 => tree.insert("Pickle")?,
                        1 => {
                            tree.delete("Pickle")?;
                        }
                        2 => {
                            tree.delete("Holmes")?;
                        }
                        _ => tree.rebalance(),
                    }
                }
                Ok(())
            })
        })
        .collect();
    for h in handles {
        match h.join() {
            Ok(result) => result?,
            Err(_) => eprintln!("worker panicked"),
        }
    }

    println!("{}", tree.dump());
    let snapshot = tree.snapshot();
    for edge in &snapshot.edges {
        println!(
            "{} -{:?}-> {} (count {})",
            edge.parent, edge.side, edge.child, edge.child_count
        );
    }
    Ok(())
}
