use crate::movie::{CrewEntry, Movie};
use crate::person::Person;
use crate::ui::{cast_table, theme, Icons};
use owo_colors::OwoColorize;

pub fn header(icon: &str, text: &str) {
    println!("{} {}", icon, text.style(theme().header.clone()));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().info.clone()),
        label.style(theme().dim.clone()),
        value
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim.clone()).to_string()
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim.clone()), value);
}

fn names(entries: &[CrewEntry]) -> String {
    entries.iter().map(|e| e.name.as_str()).collect::<Vec<_>>().join(", ")
}

/// Human-readable summary of a movie
pub fn movie_card(movie: &Movie<'_>) {
    let info = movie.info();
    println!("{} {}", Icons::FILM, movie.to_string().style(theme().title.clone()));
    if !info.genres.is_empty() {
        summary_row("Genres", &info.genres.join(", "));
    }
    if let Some(runtime) = info.runtime {
        summary_row("Runtime", &format!("{} min", runtime));
    }
    if let Some(rating) = info.rating {
        summary_row("Rating", &format!("{} {:.1}", Icons::STAR, rating));
    }
    if !info.countries.is_empty() {
        summary_row("Countries", &info.countries.join(", "));
    }
    for (role, entries) in [
        ("Director", &info.crew.director),
        ("Writer", &info.crew.writer),
        ("Composer", &info.crew.composer),
    ] {
        if !entries.is_empty() {
            summary_row(role, &names(entries));
        }
    }
    summary_row("TMDB", &movie.url());
    if let Some(url) = movie.imdb_url() {
        summary_row("IMDb", &url);
    }
    if !info.overview.is_empty() {
        println!();
        println!("{}", info.overview);
    }
    if !info.cast.is_empty() {
        section("Cast");
        println!("{}", cast_table(&info.cast));
    }
}

/// Human-readable summary of a person
pub fn person_card(person: &Person<'_>) {
    println!("{} {}", Icons::PERSON, person.to_string().style(theme().title.clone()));
    summary_row("Movies", &person.movie_ids().len().to_string());
    summary_row("TMDB", &person.url());
    if let Some(url) = person.imdb_url() {
        summary_row("IMDb", &url);
    }
}
