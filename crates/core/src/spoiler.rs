//! Derived display state: the race info line and the spoiler URL

use crate::config::UrlConfig;
use crate::models::{BuildType, RaceVersion};
use crate::seed::Seed;

/// The room's public info line for a rolled seed
pub fn info_line(version: Option<&RaceVersion>, seed: Seed, flags: &str) -> String {
    format!(
        "Randomizer {} Seed: {} Flags: {}",
        version.map(RaceVersion::as_str).unwrap_or_default(),
        seed,
        flags
    )
}

/// Link to the randomizer with flags and seed filled in
///
/// Returns `None` when no template is known for the build/version pair.
pub fn spoiler_url(
    urls: &UrlConfig,
    build: BuildType,
    version: Option<&RaceVersion>,
    flags: &str,
    seed: Seed,
) -> Option<String> {
    let template = if build == BuildType::Juef {
        &urls.juef_template
    } else {
        let version = version?.as_str();
        if !urls
            .versioned_prefixes
            .iter()
            .any(|prefix| version.starts_with(prefix.as_str()))
        {
            return None;
        }
        &urls.release_template
    };

    Some(fill_template(template, |key| match key {
        "build" => Some(build.as_str().to_string()),
        "flags" => Some(flags.to_string()),
        "seed" => Some(seed.to_string()),
        _ => None,
    }))
}

/// Expand `{key}` placeholders in a single pass; inserted values are never rescanned
fn fill_template(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match tail.find('}').and_then(|end| Some((end, lookup(&tail[1..end])?))) {
            Some((end, value)) => {
                out.push_str(&value);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seed() -> Seed {
        Seed::generate(&mut StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_info_line_format() {
        let seed = seed();
        let version = RaceVersion::parse("v9.9").unwrap();
        assert_eq!(
            info_line(Some(&version), seed, "ABC"),
            format!("Randomizer v9.9 Seed: {} Flags: ABC", seed)
        );
    }

    #[test]
    fn test_release_url() {
        let seed = seed();
        let version = RaceVersion::parse("v3.0.3").unwrap();
        let url = spoiler_url(&UrlConfig::default(), BuildType::Release, Some(&version), "FLAGS", seed);
        assert_eq!(
            url.as_deref(),
            Some(format!("https://dwrandomizer.com/release/#flags=FLAGS&seed={}", seed).as_str())
        );
    }

    #[test]
    fn test_test_event_url() {
        let version = RaceVersion::parse("v2025-TE").unwrap();
        let url = spoiler_url(&UrlConfig::default(), BuildType::Te, Some(&version), "F", seed()).unwrap();
        assert!(url.starts_with("https://dwrandomizer.com/te/#flags=F&seed="));
    }

    #[test]
    fn test_juef_url_ignores_version() {
        let url = spoiler_url(&UrlConfig::default(), BuildType::Juef, None, "F", seed()).unwrap();
        assert!(url.starts_with("https://snestop.jerther.com/misc/dwr/unofficial_juef/current/#flags=F&seed="));
    }

    #[test]
    fn test_flags_are_inserted_literally() {
        let seed = seed();
        let version = RaceVersion::parse("v3.0.3").unwrap();
        let url = spoiler_url(
            &UrlConfig::default(),
            BuildType::Release,
            Some(&version),
            "AB{seed}CD{build}",
            seed,
        )
        .unwrap();
        assert_eq!(
            url,
            format!("https://dwrandomizer.com/release/#flags=AB{{seed}}CD{{build}}&seed={}", seed)
        );
    }

    #[test]
    fn test_unknown_placeholders_are_kept() {
        let filled = fill_template("a{x}b{seed}{", |key| (key == "seed").then(|| "7".to_string()));
        assert_eq!(filled, "a{x}b7{");
    }

    #[test]
    fn test_unknown_version_has_no_url() {
        let version = RaceVersion::parse("v2.2").unwrap();
        let urls = UrlConfig::default();
        assert_eq!(spoiler_url(&urls, BuildType::Release, Some(&version), "F", seed()), None);
        assert_eq!(spoiler_url(&urls, BuildType::Beta, None, "F", seed()), None);
    }
}
