use anyhow::{Context, Result};
use regex::Regex;

use super::Normalize;

/// Ordered rewrite rules: (pattern, replacement). Matched case-insensitively.
const RULES: [(&str, &str); 4] = [
    // "815 10 hwy" -> "815 US-10"
    (r"\b(\d+)\s+(\d+)\s+hwy\b", "${1} US-${2}"),
    // "815 10 highway" -> "815 Highway 10"
    (r"\b(\d+)\s+(\d+)\s+highway\b", "${1} Highway ${2}"),
    // "815 county 5" -> "815 county-5"
    (r"\b(\d+)\s+(us|state|mn|county)\s+(\d+)\b", "${1} ${2}-${3}"),
    // "Ramsey ,MN" -> "Ramsey, MN"
    (r"\s*,\s*", ", "),
];

/// Text rewrite normalizer targeting common number-highway address forms.
#[derive(Debug, Clone)]
pub struct PatternNormalizer {
    rules: Vec<(Regex, &'static str)>,
    whitespace: Regex,
}

impl PatternNormalizer {
    pub fn new() -> Result<Self> {
        let rules = RULES.iter()
            .map(|&(pattern, replacement)| {
                let regex = Regex::new(&format!("(?i){pattern}"))
                    .with_context(|| format!("invalid rewrite rule {pattern:?}"))?;
                Ok((regex, replacement))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules, whitespace: Regex::new(r"\s+")? })
    }
}

impl PatternNormalizer {
    /// One pass of every rule in order, then whitespace collapse.
    fn rewrite(&self, text: &str) -> String {
        let mut text = text.to_string();
        for (regex, replacement) in &self.rules {
            text = regex.replace_all(&text, *replacement).into_owned();
        }
        self.whitespace.replace_all(&text, " ").trim().to_string()
    }
}

impl Normalize for PatternNormalizer {
    /// Rewrites until nothing changes. A single `replace_all` pass can consume the
    /// number a neighbouring match needs ("5 10 hwy 20 hwy"), so one pass is not enough.
    /// Terminates: each rule either removes whitespace or a "hwy" token, or moves
    /// "highway" left of its route number.
    fn normalize(&self, raw: &str) -> String {
        let mut text = self.rewrite(raw);
        loop {
            let next = self.rewrite(&text);
            if next == text {
                return text;
            }
            text = next;
        }
    }

    fn name(&self) -> &'static str { "pattern" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(raw: &str) -> String {
        PatternNormalizer::new().unwrap().normalize(raw)
    }

    #[test]
    fn number_hwy_becomes_us_route() {
        assert_eq!(normalize("815 10 hwy, Some City, MN"), "815 US-10, Some City, MN");
        assert_eq!(normalize("815 10 HWY Anoka MN"), "815 US-10 Anoka MN");
    }

    #[test]
    fn number_highway_is_reordered() {
        assert_eq!(normalize("1200 65 Highway NE, Blaine, MN"), "1200 Highway 65 NE, Blaine, MN");
    }

    #[test]
    fn route_prefix_is_hyphenated() {
        assert_eq!(normalize("14000 county 5 road"), "14000 county-5 road");
        assert_eq!(normalize("300 MN 47, Ramsey"), "300 MN-47, Ramsey");
        assert_eq!(normalize("12 US 169"), "12 US-169");
        assert_eq!(normalize("55 state 65"), "55 state-65");
    }

    #[test]
    fn rules_do_not_touch_ordinary_addresses() {
        assert_eq!(
            normalize("9200 Inverness Ln NW, Ramsey, MN 55303"),
            "9200 Inverness Ln NW, Ramsey, MN 55303"
        );
        // "hwy" without a preceding route number is left alone
        assert_eq!(normalize("815 Main hwy"), "815 Main hwy");
        // "usa" is not a route prefix
        assert_eq!(normalize("5 usa 10"), "5 usa 10");
    }

    #[test]
    fn collapses_whitespace_and_commas() {
        assert_eq!(normalize("  9200   Inverness Ln \t NW ,Ramsey,MN  "), "9200 Inverness Ln NW, Ramsey, MN");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn chained_routes_are_all_rewritten() {
        assert_eq!(normalize("5 10 hwy 20 hwy"), "5 US-10 US-20");
        assert_eq!(normalize("5 us 10 us 20"), "5 us-10 us-20");
        assert_eq!(normalize("5 1 2 highway"), "5 Highway 1 2");
    }

    #[test]
    fn idempotent() {
        let normalizer = PatternNormalizer::new().unwrap();
        for raw in [
            "815 10 hwy, Some City, MN",
            "1200 65 Highway NE, Blaine, MN",
            "14000 county 5 road",
            "  a ,, b  ,",
            ",leading comma",
            "1 2 3 hwy",
            "815 US-10, Some City, MN",
            "zzz not an address zzz",
            "5 10 hwy 20 hwy",
            "5 us 10 us 20",
            "5 1 2 highway 3 highway",
        ] {
            let once = normalizer.normalize(raw);
            assert_eq!(normalizer.normalize(&once), once, "input {raw:?}");
        }
    }
}
