// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Besides the clap struct, this file also owns parse_names(), which turns
// the raw free-text argument into a clean list of GitHub names.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate code for our types
// - Iterators: Chained transformations for cleaning up input
// =============================================================================

use clap::Parser;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "email-scout",
    version = "0.1.0",
    about = "Discover public email addresses for GitHub users and organizations",
    long_about = "email-scout takes one or more GitHub usernames or organization names and \
                  looks up their publicly discoverable email addresses via commit search, \
                  public profiles, and organization member lists."
)]
pub struct Cli {
    /// GitHub usernames and/or organization names, comma or newline separated
    ///
    /// Example: email-scout "octocat,vercel"
    ///
    /// This is a positional argument (required, no flag needed)
    pub names: String,

    /// Output results in JSON format instead of a table
    ///
    /// This is an optional flag: --json
    /// #[arg(long)] creates a flag from the field name
    #[arg(long)]
    pub json: bool,

    /// Output results as CSV (one row per discovered email)
    ///
    /// This is an optional flag: --csv
    #[arg(long)]
    pub csv: bool,

    /// GitHub API token (falls back to the GITHUB_TOKEN env var)
    ///
    /// A token is optional but raises the API rate limit considerably
    #[arg(long)]
    pub token: Option<String>,
}

// Splits the raw positional argument into individual names
//
// Users paste names separated by commas and/or newlines, often with
// stray whitespace. We trim every entry and drop the blank ones, but
// we deliberately keep duplicates and the original order.
//
// Example:
//   "octocat,  vercel \n " -> ["octocat", "vercel"]
pub fn parse_names(raw: &str) -> Vec<String> {
    raw.split(|c| c == ',' || c == '\n' || c == '\r')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What are derive macros?
//    - #[derive(...)] automatically generates code for common operations
//    - Parser: generates CLI parsing logic
//    - Debug: generates code to print the struct for debugging
//
// 2. Why String instead of &str in the struct?
//    - String is owned (the struct owns the data)
//    - &str is borrowed (references data owned elsewhere)
//    - We use String here because we need to own the CLI arguments
//
// 3. What is split(|c| ...)?
//    - split() can take a closure as the separator test
//    - Here any comma or line break acts as a separator
//    - Consecutive separators produce empty entries, which filter() removes
//
// 4. Why no deduplication in parse_names?
//    - If the user types a name twice, they get it resolved twice
//    - Surprising the user by silently dropping input is worse
// -----------------------------------------------------------------------------
