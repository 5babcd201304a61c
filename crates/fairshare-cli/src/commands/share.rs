use fairshare_resources::Resources;
use fairshare_sorter::dominant_share;

pub fn share(total: &str, allocation: &str) -> anyhow::Result<()> {
    let total = Resources::parse(total)?;
    let allocation = Resources::parse(allocation)?;

    print!("{}", format_share(&total, &allocation));
    Ok(())
}

/// The dominant share on the first line, then one line per scalar
/// dimension the total actually offers.
fn format_share(total: &Resources, allocation: &Resources) -> String {
    let mut out = format!("{:.4}\n", dominant_share(allocation, total));

    for (name, amount) in total.scalars().filter(|(_, amount)| *amount > 0.0) {
        let held = allocation.get_scalar(name).unwrap_or(0.0);
        out.push_str(&format!("  {name:<12} {held} / {amount} = {:.4}\n", held / amount));
    }
    out
}
