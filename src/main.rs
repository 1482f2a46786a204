//! # dirhash CLI
//!
//! Command-line interface for the directory tree checksummer.
//!
//! ## Usage
//! ```bash
//! dirhash scan ~/data --workers 10
//! dirhash scan ~/data --algorithm xxh3 --output json
//! ```

mod cli;

use dirhash::Result;

fn main() -> Result<()> {
    cli::run()
}
