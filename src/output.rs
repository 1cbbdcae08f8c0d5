// src/output.rs
// =============================================================================
// This module renders resolution results for the terminal.
//
// Three formats:
// - Table: human-readable, with a summary block at the end
// - JSON: the ResolvedEntity list serialized as-is (--json)
// - CSV: one row per discovered email, for spreadsheets (--csv)
//
// None of this is resolution logic - it only reshapes what the
// resolver already produced.
// =============================================================================

use anyhow::Result;

use crate::resolver::{EntityKind, ResolvedEntity};

// Prints the results in the requested format
//
// json wins over csv if someone passes both flags
pub fn print_results(results: &[ResolvedEntity], json: bool, csv: bool) -> Result<()> {
    if json {
        // Serialize results to JSON and print
        let json_output = serde_json::to_string_pretty(results)?;
        println!("{}", json_output);
    } else if csv {
        print!("{}", to_csv(results));
    } else {
        print_table(results);
    }
    Ok(())
}

fn kind_label(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Individual => "individual",
        EntityKind::Organization => "organization",
    }
}

// Prints results as a human-readable table in the terminal
fn print_table(results: &[ResolvedEntity]) {
    for entity in results {
        println!();
        println!("🔎 {} ({})", entity.input_name, kind_label(entity.kind));

        if entity.members.is_empty() {
            println!("   (no enumerable members)");
            continue;
        }

        // Print table header
        println!("   {:<22} {:<26} {:<35}", "LOGIN", "NAME", "EMAIL");
        println!("   {}", "-".repeat(83));

        for member in &entity.members {
            let name = member.display_name.as_deref().unwrap_or("");

            if member.emails.is_empty() {
                // One row even without emails, so every member shows up
                println!("   {:<22} {:<26} {:<35}", member.login, name, "");
                continue;
            }

            for email in &member.emails {
                println!("   {:<22} {:<26} {:<35}", member.login, name, email);
            }
        }
    }

    println!();

    // Print summary
    let entity_count = results.len();
    let user_count: usize = results.iter().map(|e| e.members.len()).sum();
    let email_count: usize = results.iter().map(|e| e.email_count()).sum();

    println!("📊 Summary:");
    println!("   📋 Names resolved: {}", entity_count);
    println!("   👤 Users found: {}", user_count);
    println!("   📧 Emails discovered: {}", email_count);
}

// Builds the CSV export: fixed columns, one row per email (or one row
// with an empty email field when a user has none)
fn to_csv(results: &[ResolvedEntity]) -> String {
    let mut out = String::from("input,kind,login,name,profile_url,email\n");

    for entity in results {
        for member in &entity.members {
            let base = [
                entity.input_name.as_str(),
                kind_label(entity.kind),
                member.login.as_str(),
                member.display_name.as_deref().unwrap_or(""),
                member.profile_url.as_str(),
            ];

            if member.emails.is_empty() {
                push_row(&mut out, &base, "");
            } else {
                for email in &member.emails {
                    push_row(&mut out, &base, email);
                }
            }
        }
    }

    out
}

fn push_row(out: &mut String, base: &[&str; 5], email: &str) {
    let fields: Vec<String> = base
        .iter()
        .copied()
        .chain(std::iter::once(email))
        .map(csv_escape)
        .collect();
    out.push_str(&fields.join(","));
    out.push('\n');
}

// Quotes a CSV field when it needs it (commas, quotes, line breaks)
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolvedUser;

    fn user(login: &str, name: Option<&str>, emails: &[&str]) -> ResolvedUser {
        ResolvedUser {
            login: login.to_string(),
            display_name: name.map(str::to_string),
            profile_url: format!("https://github.com/{}", login),
            emails: emails.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[test]
    fn test_csv_escape_plain() {
        assert_eq!(csv_escape("octocat"), "octocat");
    }

    #[test]
    fn test_csv_escape_comma_and_quote() {
        assert_eq!(csv_escape("Doe, John"), "\"Doe, John\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_csv_one_row_per_email() {
        let results = vec![ResolvedEntity {
            input_name: "mona".to_string(),
            kind: EntityKind::Individual,
            members: vec![user(
                "mona",
                Some("Mona"),
                &["a@example.com", "b@example.com"],
            )],
        }];

        let csv = to_csv(&results);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3); // header + 2 email rows
        assert_eq!(lines[0], "input,kind,login,name,profile_url,email");
        assert_eq!(
            lines[1],
            "mona,individual,mona,Mona,https://github.com/mona,a@example.com"
        );
        assert_eq!(
            lines[2],
            "mona,individual,mona,Mona,https://github.com/mona,b@example.com"
        );
    }

    #[test]
    fn test_csv_empty_email_row() {
        let results = vec![ResolvedEntity {
            input_name: "acme".to_string(),
            kind: EntityKind::Organization,
            members: vec![user("wile", None, &[])],
        }];

        let csv = to_csv(&results);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        // A user with no emails still gets one row, email field empty
        assert_eq!(lines[1], "acme,organization,wile,,https://github.com/wile,");
    }
}
