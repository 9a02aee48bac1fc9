// Colored terminal output for location lists.
//
// This module handles all terminal-specific formatting. main.rs gathers the
// data and delegates the printing here.

use colored::Colorize;

use crate::db::models::{LikedLocation, Location};
use crate::recommend::RefreshOutcome;

/// Display a list of locations under a heading.
pub fn display_locations(title: &str, locations: &[Location]) {
    println!(
        "\n{}",
        format!("=== {title} ({} locations) ===", locations.len()).bold()
    );
    println!();

    if locations.is_empty() {
        println!("  {}", "Nothing to show.".dimmed());
        return;
    }

    println!(
        "  {:>5}  {:<32} {:<22} {:>8}  {}",
        "Id".dimmed(),
        "Name".dimmed(),
        "Where".dimmed(),
        "Entry".dimmed(),
        "Description".dimmed(),
    );
    println!("  {}", "-".repeat(90).dimmed());

    for location in locations {
        println!(
            "  {:>5}  {:<32} {:<22} {:>8}  {}",
            location.id,
            super::truncate_chars(&location.display_name(), 30),
            super::truncate_chars(&place(location), 20),
            super::format_price(location.entry_price),
            super::truncate_chars(&location.description, 60).dimmed(),
        );
    }
    println!();
}

/// Display a user's liked locations.
pub fn display_liked(user: &str, liked: &[LikedLocation]) {
    let locations: Vec<Location> = liked.iter().map(|l| l.location.clone()).collect();
    display_locations(&format!("Liked by {user}"), &locations);
}

/// One-line summary of a refresh.
pub fn display_refresh(user: &str, outcome: &RefreshOutcome) {
    match outcome {
        RefreshOutcome::Stored(ids) => println!(
            "{} Stored {} recommendations for {user}",
            "✓".green(),
            ids.len()
        ),
        RefreshOutcome::Cleared => println!(
            "{} Not enough data for {user}; recommendations cleared",
            "-".dimmed()
        ),
    }
}

/// A like state as a colored word.
pub fn like_state(liked: bool) -> colored::ColoredString {
    if liked {
        "liked".green().bold()
    } else {
        "not liked".dimmed()
    }
}

/// "City, State" with whatever parts are present.
fn place(location: &Location) -> String {
    let parts: Vec<&str> = [location.city.as_deref(), location.state.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}
