use crate::movie::CastEntry;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

#[derive(Tabled)]
struct CastRow {
    #[tabled(rename = "Actor")]
    actor: String,
    #[tabled(rename = "Character")]
    character: String,
    #[tabled(rename = "Person id")]
    pid: i64,
}

pub fn cast_table(cast: &[CastEntry]) -> String {
    let rows: Vec<CastRow> = cast
        .iter()
        .map(|c| CastRow {
            actor: c.actor.clone(),
            character: c.character.clone(),
            pid: c.pid,
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_table() {
        let table = stats_table(&[("Movies", "2"), ("Persons", "14")]);
        assert!(table.contains("Metric"));
        assert!(table.contains("Persons"));
        assert!(table.contains("14"));
        assert!(TableBuilder::new().build().is_empty());
    }

    #[test]
    fn test_cast_table() {
        let table = cast_table(&[CastEntry { character: "Narrator".into(), actor: "Edward Norton".into(), pid: 819 }]);
        assert!(table.contains("Edward Norton"));
        assert!(table.contains("819"));
    }
}
