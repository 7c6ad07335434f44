use anyhow::Result;

use crate::config::ZettelConfig;

/// Record a curated relation edge between two ideas.
pub fn relate(
    config: &ZettelConfig,
    source_id: i64,
    target_id: i64,
    kind: &str,
    confidence: f64,
) -> Result<()> {
    let store = super::open_store(config)?;
    store.add_relation(source_id, target_id, kind, confidence)?;
    println!("Related #{source_id} -[{kind} {confidence:.2}]-> #{target_id}");
    Ok(())
}
