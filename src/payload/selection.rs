use crate::config::target::InjectionSettings;
use crate::payload::{Catalog, Payload};
use rand::Rng;

/// Concatenates the requested categories in the order given. `None`
/// takes every category in catalog order; unknown names are skipped.
pub fn gather(catalog: &Catalog, categories: Option<&[String]>) -> Vec<Payload> {
    let names: Vec<&str> = match categories {
        Some(requested) => requested.iter().map(String::as_str).collect(),
        None => catalog.categories().collect(),
    };

    let mut out = Vec::new();
    for name in names {
        match catalog.group(name) {
            Some((category, texts)) => {
                out.extend(texts.iter().map(|text| Payload { category, text }));
            }
            None => tracing::warn!("Unknown {} payload category '{}', skipping", catalog.name, name),
        }
    }
    out
}

/// Payloads for one field: the configured categories, reduced to a
/// random sample of `max_attempts_per_field` when that cap is smaller
/// than the pool.
pub fn select<R: Rng + ?Sized>(
    catalog: &Catalog,
    settings: &InjectionSettings,
    rng: &mut R,
) -> Vec<Payload> {
    let pool = gather(catalog, settings.payload_categories.as_deref());
    let cap = settings.max_attempts_per_field;

    if cap == 0 || cap >= pool.len() {
        return pool;
    }

    rand::seq::index::sample(rng, pool.len(), cap)
        .into_iter()
        .map(|i| pool[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::sql::SQL_PAYLOADS;
    use crate::payload::xss::XSS_PAYLOADS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn settings(categories: Option<Vec<&str>>, cap: usize) -> InjectionSettings {
        InjectionSettings {
            payload_categories: categories.map(|c| c.into_iter().map(String::from).collect()),
            max_attempts_per_field: cap,
            test_all_fields: true,
        }
    }

    #[test]
    fn test_gather_all_when_unset() {
        assert_eq!(gather(&SQL_PAYLOADS, None).len(), SQL_PAYLOADS.total());
    }

    #[test]
    fn test_gather_respects_request_order_and_skips_unknown() {
        let cats = vec!["time".to_string(), "bogus".to_string(), "basic".to_string()];
        let out = gather(&SQL_PAYLOADS, Some(&cats));
        assert_eq!(out.len(), 8);
        assert_eq!(out[0].category, "time");
        assert_eq!(out[7].category, "basic");
    }

    #[test]
    fn test_select_caps_with_distinct_sample() {
        let mut rng = StdRng::seed_from_u64(7);
        let out = select(&SQL_PAYLOADS, &settings(Some(vec!["basic"]), 2), &mut rng);
        assert_eq!(out.len(), 2);
        let distinct: HashSet<_> = out.iter().map(|p| p.text).collect();
        assert_eq!(distinct.len(), 2);
        assert!(out.iter().all(|p| p.category == "basic"));
    }

    #[test]
    fn test_select_cap_at_or_above_pool_keeps_everything() {
        let mut rng = StdRng::seed_from_u64(1);
        let out = select(&XSS_PAYLOADS, &settings(Some(vec!["dom"]), 3), &mut rng);
        assert_eq!(out.len(), 3);
        let out = select(&XSS_PAYLOADS, &settings(Some(vec!["dom"]), 0), &mut rng);
        assert_eq!(out.len(), 3);
    }
}
