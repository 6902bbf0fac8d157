// Related-notes scenarios over a small learning-notes vault

#[cfg(test)]
mod tests {
    use crate::config::{RelatedConfig, SearchConfig};
    use crate::note::NoteRecord;
    use crate::related::{find_related, find_related_with, rank_related, text_similarity_scores};

    fn notes() -> Vec<NoteRecord> {
        vec![
            NoteRecord::new("1", "React Hooks 學習")
                .with_tags(["react", "hooks"])
                .with_note_type("learning")
                .with_created_at("2026-02-15T10:00:00Z"),
            NoteRecord::new("2", "React 效能優化")
                .with_tags(["react", "performance"])
                .with_note_type("learning")
                .with_created_at("2026-02-14T10:00:00Z"),
            NoteRecord::new("3", "工作決策")
                .with_tags(["career"])
                .with_note_type("decision")
                .with_created_at("2026-02-15T10:00:00Z"),
            NoteRecord::new("4", "React Router")
                .with_tags(["react", "router"])
                .with_note_type("thought")
                .with_created_at("2025-06-01T10:00:00Z"),
            NoteRecord::new("5", "Python 基礎")
                .with_tags(["python"])
                .with_note_type("learning")
                .with_created_at("2026-02-10T10:00:00Z"),
        ]
    }

    fn ids(result: &[&NoteRecord]) -> Vec<String> {
        result.iter().map(|n| n.id.clone()).collect()
    }

    fn position(result: &[&NoteRecord], id: &str) -> Option<usize> {
        result.iter().position(|n| n.id == id)
    }

    /// Precomputed related field from index.json takes precedence
    #[test]
    fn test_prefers_precomputed_related() {
        let all = notes();
        let focal = all[0].clone().with_related(["2", "4"]);
        let result = find_related(&focal, &all, 5);
        assert_eq!(ids(&result), vec!["2", "4"]);
    }

    #[test]
    fn test_hint_ignores_similarity() {
        let all = notes();
        // "3" and "5" share nothing with the focal note
        let focal = all[0].clone().with_related(["5", "3"]);
        assert_eq!(ids(&find_related(&focal, &all, 5)), vec!["5", "3"]);
    }

    #[test]
    fn test_empty_hint_falls_back_to_scoring() {
        let all = notes();
        let focal = all[0].clone().with_related(Vec::<String>::new());
        assert_eq!(
            ids(&find_related(&focal, &all, 5)),
            ids(&find_related(&all[0], &all, 5))
        );
    }

    #[test]
    fn test_falls_back_to_scoring_without_hint() {
        let all = notes();
        let result = find_related(&all[0], &all, 3);
        assert!(result.len() <= 3);
        assert!(result.iter().all(|n| n.id != "1"));
    }

    #[test]
    fn test_prioritizes_tag_overlap() {
        let all = notes();
        let result = find_related(&all[0], &all, 5);

        let react_first = [position(&result, "2"), position(&result, "4")]
            .into_iter()
            .flatten()
            .min()
            .expect("a react note should be related");
        if let Some(python) = position(&result, "5") {
            assert!(react_first < python);
        }
        assert_eq!(result[0].id, "2");
    }

    #[test]
    fn test_breakdown_for_close_sibling() {
        let all = notes();
        let ranked = rank_related(&all[0], &all, &RelatedConfig::default());
        let sibling = ranked.iter().find(|r| r.note.id == "2").unwrap();

        assert!((sibling.breakdown.tag - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(sibling.breakdown.note_type, 1.0);
        // One day apart in a 90 day window
        assert!((sibling.breakdown.time - (1.0 - 1.0 / 90.0)).abs() < 1e-9);
        assert!(sibling.breakdown.text > 0.0 && sibling.breakdown.text <= 1.0);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_old_note_gets_no_time_credit() {
        let all = notes();
        let ranked = rank_related(&all[0], &all, &RelatedConfig::default());
        let router = ranked.iter().find(|r| r.note.id == "4").unwrap();
        assert_eq!(router.breakdown.time, 0.0);
        assert_eq!(router.breakdown.note_type, 0.0);
    }

    #[test]
    fn test_returns_empty_for_single_note() {
        let all = notes();
        assert!(find_related(&all[0], &all[..1], 3).is_empty());
    }

    #[test]
    fn test_returns_at_most_n() {
        let all = notes();
        for n in 0..=6 {
            assert!(find_related(&all[0], &all, n).len() <= n);
        }
        assert!(find_related(&all[0], &all, 0).is_empty());
    }

    #[test]
    fn test_focal_outside_corpus() {
        let all = notes();
        let outsider = NoteRecord::new("x", "React").with_tags(["react"]);
        let result = find_related(&outsider, &all, 5);
        assert!(!result.is_empty());
        assert!(result.iter().all(|n| n.id != "x"));
    }

    #[test]
    fn test_raised_noise_floor_drops_weak_matches() {
        let all = notes();
        let config = RelatedConfig {
            noise_floor: 0.9,
            ..RelatedConfig::default()
        };
        assert!(find_related_with(&all[0], &all, 5, &config).is_empty());
    }

    #[test]
    fn test_duplicate_ids_in_corpus_appear_once() {
        let mut all = notes();
        all.push(all[1].clone());
        let result = find_related(&all[0], &all, 10);
        assert_eq!(result.iter().filter(|n| n.id == "2").count(), 1);
    }

    #[test]
    fn test_unparseable_date_gets_no_time_credit() {
        let all = notes();
        let corpus = vec![
            all[0].clone(),
            NoteRecord::new("x", "Undated").with_tags(["react"]).with_created_at("not a date"),
        ];
        let ranked = rank_related(&corpus[0], &corpus, &RelatedConfig::default());
        let undated = ranked.iter().find(|r| r.note.id == "x").expect("shared tag clears the floor");
        // Read as the epoch, decades outside the window
        assert_eq!(undated.breakdown.time, 0.0);
        assert!((undated.breakdown.tag - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_shared_letters_are_not_text_similarity() {
        let corpus = vec![
            NoteRecord::new("f", "cat").with_created_at("2020-01-01"),
            NoteRecord::new("b", "attention budget").with_created_at("2026-02-15"),
        ];
        let scores = text_similarity_scores(&corpus[0], &corpus, &SearchConfig::default());
        assert!(!scores.contains_key("b"));
        assert!(find_related(&corpus[0], &corpus, 5).is_empty());
    }

    #[test]
    fn test_missing_fields_do_not_panic() {
        let all = vec![
            NoteRecord::new("a", ""),
            NoteRecord::new("b", "").with_created_at("garbage"),
            NoteRecord::new("c", "Title only"),
        ];
        for focal in &all {
            let result = find_related(focal, &all, 5);
            assert!(result.iter().all(|n| n.id != focal.id));
        }
        println!("✅ missing fields degrade to zero signals");
    }
}
