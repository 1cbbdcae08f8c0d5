// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Split the raw input into individual GitHub names
// 3. Build the GitHub client (reading the token exactly once)
// 4. Resolve every name and print the results
// 5. Exit with proper code (0 = emails found, 1 = none found, 2 = error)
//
// Rust concepts used:
// - async/await: Because resolution means a series of network requests
// - Result<T, E>: For error handling (T = success type, E = error type)
// - Option chaining: For the token fallback (flag, then env var)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;           // src/cli.rs - command-line parsing and input splitting
mod github;        // src/github/ - GitHub API client
mod output;        // src/output.rs - table/JSON/CSV rendering
mod resolver;      // src/resolver/ - classification and email gathering

// Import items we need from our modules
use cli::Cli;
use clap::Parser;  // Parser trait enables the parse() method
use github::{GithubClient, GithubConfig};

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::Result;

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // A propagated failure (rate limit, network trouble):
            // print it and exit with code 2
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = at least one email discovered
//   Ok(1) = everything resolved, but no emails anywhere
//   Ok(2) = bad input
//   Err = propagated failure (rate limit, transport)
async fn run() -> Result<i32> {
    // Parse command-line arguments into our Cli struct
    // This will automatically handle --help, --version, etc.
    let args = Cli::parse();

    // Split the free-text argument into clean names
    let names = cli::parse_names(&args.names);

    if names.is_empty() {
        // Malformed input is rejected before any network call
        eprintln!("Error: no names provided (give comma or newline separated GitHub names)");
        return Ok(2);
    }

    // The token is read exactly once, here, and travels inside the
    // config from now on - never as ambient global state
    let token = args.token.or_else(|| std::env::var("GITHUB_TOKEN").ok());
    let has_token = token.is_some();

    let client = GithubClient::new(GithubConfig {
        token,
        ..GithubConfig::default()
    });

    // Progress chatter only in table mode - JSON and CSV go to stdout
    // and must stay machine-readable
    let quiet = args.json || args.csv;

    if !quiet {
        println!("🔍 Resolving {} name(s)...", names.len());
        if !has_token {
            println!("⚠️  No GITHUB_TOKEN set - the anonymous rate limit is low");
        }
    }

    // Resolve every name, strictly in order; a rate limit anywhere
    // aborts the whole batch via the ? operator
    let results = resolver::resolve_names(&client, &names).await?;

    // Print results in the requested format
    output::print_results(&results, args.json, args.csv)?;

    // Count how many emails we actually discovered
    let email_total: usize = results.iter().map(|entity| entity.email_count()).sum();

    if email_total > 0 {
        Ok(0)  // Exit code 0 = emails found
    } else {
        Ok(1)  // Exit code 1 = resolved cleanly, nothing discovered
    }
}
