use fairshare_resources::Resources;

pub fn parse(text: &str, format: &str) -> anyhow::Result<()> {
    let resources = Resources::parse(text)?;

    match format {
        "json" => {
            let output = json_dimensions(&resources);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => print!("{}", format_dimensions(&resources)),
    }

    Ok(())
}

/// `{ name: { kind, value } }` for every dimension.
fn json_dimensions(resources: &Resources) -> serde_json::Value {
    let dimensions: serde_json::Map<String, serde_json::Value> = resources
        .iter()
        .map(|(name, value)| {
            let entry = serde_json::json!({
                "kind": value.kind().to_string(),
                "value": value.to_string(),
            });
            (name.to_string(), entry)
        })
        .collect();
    serde_json::Value::Object(dimensions)
}

fn format_dimensions(resources: &Resources) -> String {
    let mut out = format!("{resources}\n");
    for (name, value) in resources.iter() {
        out.push_str(&format!("  {name:<12} {:<7} {value}\n", value.kind().to_string()));
    }
    out
}
