use tabled::{Table, Tabled};
use vigil_config::VigilConfig;
use vigil_core::VigilError;
use vigil_engine::{extract, Classification, NormalizedLogRecord};

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Reason")]
    reason: String,
    #[tabled(rename = "Message")]
    message: String,
}

pub fn run(
    config: &VigilConfig,
    search: Option<String>,
    class: Option<String>,
    wide: bool,
    json: bool,
) -> Result<(), VigilError> {
    let records = super::fetch_all_normalized(config);

    // clap restricts the label to normal|abnormal.
    let class_filter = class.as_deref().and_then(Classification::parse);

    let term = search.unwrap_or_default();
    let shown: Vec<&NormalizedLogRecord> = records
        .iter()
        .filter(|r| r.matches_search(&term))
        .filter(|r| class_filter.map_or(true, |c| r.class() == c))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&shown).unwrap_or_default());
        return Ok(());
    }

    let abnormal = records.iter().filter(|r| r.is_abnormal()).count();
    println!(
        "[vigil] {} total logs | {} abnormal | {} normal | {} shown",
        records.len(),
        abnormal,
        records.len() - abnormal,
        shown.len()
    );

    if shown.is_empty() {
        println!("[vigil] No logs match the current filter");
        return Ok(());
    }

    if wide {
        println!("{}", wide_table(&shown));
    } else {
        let rows: Vec<LogRow> = shown
            .iter()
            .map(|r| LogRow {
                id: r.id.clone(),
                time: r.time.clone(),
                source: r.source.clone(),
                class: r.class().as_str().to_string(),
                reason: r.reason.clone(),
                message: super::truncate(&r.message, 60),
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    Ok(())
}

/// The full flattened-field column set, one column per display field.
fn wide_table(records: &[&NormalizedLogRecord]) -> Table {
    let columns = extract::table_field_names();

    let mut builder = tabled::builder::Builder::default();
    let mut header: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    header.push("Class".into());
    header.push("Reason".into());
    builder.push_record(header);

    for r in records {
        let mut row: Vec<String> = columns
            .iter()
            .map(|c| r.display.get(*c).cloned().unwrap_or_default())
            .collect();
        row.push(r.class().as_str().to_string());
        row.push(r.reason.clone());
        builder.push_record(row);
    }

    builder.build()
}
