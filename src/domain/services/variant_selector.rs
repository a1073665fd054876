//! Pre-download choice of which remote variant to fetch.

use tracing::debug;

use crate::domain::entities::{EmoteManifest, EmoteVariant, FittingResult};
use crate::domain::errors::EmoteError;

/// Highest resolution tier offered by the remote host.
pub const MAX_TIER: u8 = 4;

/// Returns the file name the host uses for a tier.
#[must_use]
pub fn tier_file_name(tier: u8, animated: bool) -> String {
    let ext = if animated { "gif" } else { "png" };
    format!("{tier}x.{ext}")
}

/// Picks the highest tier whose declared size fits the budget.
///
/// The declared size is only a hint: the transcoder re-checks the bytes it
/// actually produces.
///
/// # Errors
/// Returns [`EmoteError::NoFittingVariant`] if no tier qualifies.
pub fn select_variant(
    manifest: &EmoteManifest,
    animated: bool,
    size_limit: u64,
) -> Result<FittingResult, EmoteError> {
    for tier in (1..=MAX_TIER).rev() {
        let wanted = tier_file_name(tier, animated);

        let Some(variant) = manifest
            .variants
            .iter()
            .filter(|v| v.file_name == wanted)
            .find(|v| v.size_bytes <= size_limit)
        else {
            continue;
        };

        debug!(
            emote_id = %manifest.id,
            file = %variant.file_name,
            size = variant.size_bytes,
            budget = size_limit,
            "Selected emote variant"
        );

        return Ok(fitting(manifest, variant));
    }

    Err(EmoteError::NoFittingVariant {
        emote_id: manifest.id.clone(),
        budget: size_limit,
    })
}

fn fitting(manifest: &EmoteManifest, variant: &EmoteVariant) -> FittingResult {
    FittingResult {
        variant: variant.clone(),
        width: variant.width,
        height: variant.height,
        download_url: manifest.download_url(variant),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const BUDGET: u64 = 262_144;

    fn manifest(variants: Vec<EmoteVariant>) -> EmoteManifest {
        EmoteManifest {
            id: "60ae958e229664e8667aea38".to_string(),
            name: "peepoHey".to_string(),
            animated: true,
            host_url: "//cdn.7tv.app/emote/60ae958e229664e8667aea38".to_string(),
            variants,
        }
    }

    fn full_set(ext: &str, sizes: [u64; 4]) -> Vec<EmoteVariant> {
        (1..=4u32)
            .map(|tier| {
                EmoteVariant::new(
                    format!("{tier}x.{ext}"),
                    32 * tier,
                    32 * tier,
                    sizes[tier as usize - 1],
                )
            })
            .collect()
    }

    #[test]
    fn test_only_oversized_4x_fails() {
        let m = manifest(vec![EmoteVariant::new("4x.gif", 128, 128, 300_000)]);

        let err = select_variant(&m, true, BUDGET).unwrap_err();

        assert!(matches!(
            err,
            EmoteError::NoFittingVariant { budget: BUDGET, .. }
        ));
    }

    #[test_case([1_000, 2_000, 3_000, 4_000], "4x.gif" ; "largest_fits")]
    #[test_case([1_000, 2_000, 3_000, 400_000], "3x.gif" ; "falls_back_one_tier")]
    #[test_case([1_000, 300_000, 300_000, 400_000], "1x.gif" ; "only_smallest_fits")]
    #[test_case([1_000, 2_000, BUDGET, 400_000], "3x.gif" ; "exact_budget_fits")]
    fn test_picks_highest_fitting_tier(sizes: [u64; 4], expected: &str) {
        let m = manifest(full_set("gif", sizes));

        let result = select_variant(&m, true, BUDGET).unwrap();

        assert_eq!(result.variant.file_name, expected);
        assert!(result.variant.size_bytes <= BUDGET);
    }

    #[test]
    fn test_extension_follows_animated_flag() {
        let mut variants = full_set("gif", [10; 4]);
        variants.extend(full_set("png", [10, 10, 10, 400_000]));
        variants.extend(full_set("webp", [1; 4]));
        let m = manifest(variants);

        let result = select_variant(&m, false, BUDGET).unwrap();

        assert_eq!(result.variant.file_name, "3x.png");
        assert_eq!(result.width, 96);
        assert_eq!(
            result.download_url,
            "https://cdn.7tv.app/emote/60ae958e229664e8667aea38/3x.png"
        );
    }

    #[test]
    fn test_missing_tiers_are_skipped() {
        let m = manifest(vec![
            EmoteVariant::new("2x.gif", 64, 64, 5_000),
            EmoteVariant::new("4x.webp", 128, 128, 5_000),
        ]);

        let result = select_variant(&m, true, BUDGET).unwrap();

        assert_eq!(result.variant.file_name, "2x.gif");
    }

    #[test]
    fn test_never_exceeds_budget() {
        for budget in [0, 1, 999, 1_000, 2_500, 4_000, 10_000] {
            let m = manifest(full_set("gif", [1_000, 2_000, 3_000, 4_000]));
            if let Ok(result) = select_variant(&m, true, budget) {
                assert!(result.variant.size_bytes <= budget);
            }
        }
    }
}
