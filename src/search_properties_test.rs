// Index build/query properties on larger generated vaults

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use crate::note::NoteRecord;
    use crate::related::find_related;
    use crate::search::{IndexMode, SearchIndex};

    const NOTE_COUNT: usize = 2000;

    const TOPICS: [(&str, &str); 4] = [
        ("rust", "所有權 借用 生命週期"),
        ("react", "元件 狀態 渲染"),
        ("career", "工作 決策 面試"),
        ("python", "資料 分析 腳本"),
    ];

    fn generated_vault(count: usize) -> Vec<NoteRecord> {
        (0..count)
            .map(|i| {
                let (tag, body) = TOPICS[i % TOPICS.len()];
                NoteRecord::new(format!("note-{:05}", i), format!("{} note {}", tag, i))
                    .with_tags([tag.to_string(), format!("batch{}", i % 10)])
                    .with_text(format!("{} {} entry {}", body, tag, i))
                    .with_created_at(format!("2026-01-{:02}", (i % 28) + 1))
            })
            .collect()
    }

    #[test]
    fn test_rebuilds_are_idempotent() {
        let vault = generated_vault(300);
        let first = SearchIndex::build(&vault).unwrap();
        let second = SearchIndex::build(&vault).unwrap();

        for query in ["rust", "渲染", "career 面試", "note 42", "pyth"] {
            assert_eq!(first.search(query).unwrap(), second.search(query).unwrap(), "query {}", query);
        }
    }

    #[test]
    fn test_large_vault_search() {
        let vault = generated_vault(NOTE_COUNT);

        let start = Instant::now();
        let index = SearchIndex::build(&vault).unwrap();
        println!("Indexed {} notes in {:?}", NOTE_COUNT, start.elapsed());
        assert_eq!(index.document_count(), NOTE_COUNT);

        let start = Instant::now();
        let hits = index.search("借用").unwrap();
        println!("Query returned {} hits in {:?}", hits.len(), start.elapsed());

        // Every rust note carries 借用 in its body; nothing else does
        assert_eq!(hits.len(), NOTE_COUNT / TOPICS.len());
        assert!(hits.iter().all(|h| vault[h.id[5..].parse::<usize>().unwrap()].tags[0] == "rust"));
    }

    #[test]
    fn test_duplicates_at_scale() {
        let mut vault = generated_vault(500);
        let copies: Vec<NoteRecord> = vault
            .iter()
            .take(100)
            .map(|n| NoteRecord::new(n.id.clone(), "shadowed copy"))
            .collect();
        vault.extend(copies);

        let index = SearchIndex::build(&vault).unwrap();
        assert_eq!(index.document_count(), 500);
        assert!(index.search("shadowed").unwrap().is_empty());
    }

    #[test]
    fn test_one_segmented_note_switches_whole_vault() {
        let mut vault = generated_vault(200);
        vault.push(NoteRecord::new("seg", "segmented").with_search_tokens(["生命週期"]));

        let index = SearchIndex::build(&vault).unwrap();
        assert_eq!(index.mode(), IndexMode::Precomputed);

        let hits = index.search("生命週期").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "seg");
    }

    #[test]
    fn test_related_on_large_vault() {
        let vault = generated_vault(NOTE_COUNT);
        let start = Instant::now();
        let related = find_related(&vault[0], &vault, 5);
        println!("Related notes computed in {:?}", start.elapsed());

        assert_eq!(related.len(), 5);
        assert!(related.iter().all(|n| n.id != vault[0].id));
        // Same topic and batch beat everything else on tag overlap
        assert!(related.iter().all(|n| n.tags == vault[0].tags));
        println!("✅ related notes stay on topic at {} notes", NOTE_COUNT);
    }
}
