use crate::domain::models::JsonOut;
use serde::Serialize;

/// JSON envelope or human text. `ok` is reported as-is in JSON mode; text
/// mode leaves status to the renderer.
pub fn print_report<T: Serialize>(
    json: bool,
    ok: bool,
    data: &T,
    render: impl Fn(&T) -> Vec<String>,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&JsonOut { ok, data })?);
    } else {
        for line in render(data) {
            println!("{}", line);
        }
    }
    Ok(())
}

pub fn print_one<T: Serialize>(
    json: bool,
    data: T,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    print_report(json, true, &data, |d| vec![row(d)])
}
