use tracing::{debug, info};

use crate::error::AppResult;
use crate::metrics::{Encoder, RandomSource, encode_line};

use super::files::write_text;
use super::settings::RunSettings;

/// Writes `settings.items` randomized lines to the input file and returns the
/// number written.
pub(crate) async fn generate(settings: &RunSettings, rng: &mut dyn RandomSource) -> AppResult<usize> {
    let encoder = Encoder::new(&settings.catalog, rng);
    info!(
        "Generating {} records with suffix '{}' into {}.",
        settings.items,
        encoder.suffix(),
        settings.input.display()
    );

    let mut content = String::with_capacity(settings.items.saturating_mul(64));
    for index in 0..settings.items {
        let record = encoder.generate(index, rng);
        let line = encode_line(&record);
        debug!("Generated {}", line);
        content.push_str(&line);
        content.push('\n');
    }

    write_text(&settings.input, &content).await?;
    Ok(settings.items)
}
