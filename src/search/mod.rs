pub mod documents;
pub mod tokenizer;

use serde::{Deserialize, Serialize};
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, BoostQuery, FuzzyTermQuery, Occur, Query, TermQuery};
use tantivy::schema::*;
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument};

use crate::config::SearchConfig;
use crate::error::Result;
use crate::note::NoteRecord;
use documents::{prepare_documents, IndexDocument};
use tokenizer::{CjkUnigramTokenizer, WhitespaceLowerTokenizer, CJK_UNIGRAM, WHITESPACE_LOWER};

pub use tokenizer::IndexMode;

/// Largest edit distance the fuzzy automaton supports
const MAX_FUZZY_DISTANCE: u8 = 2;

/// Writer heap for the in-memory index (tantivy's per-thread minimum)
const WRITER_MEMORY_BYTES: usize = 15_000_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
}

/// In-memory lexical index over one corpus snapshot.
///
/// Built once per snapshot and queried any number of times; rebuild it
/// when the corpus changes. The only way to obtain one is [`SearchIndex::build`].
pub struct SearchIndex {
    reader: IndexReader,
    mode: IndexMode,
    config: SearchConfig,
    document_count: usize,
    f_id: Field,
    f_title: Field,
    f_body: Field,
    f_tags: Field,
}

impl SearchIndex {
    pub fn build(notes: &[NoteRecord]) -> Result<Self> {
        Self::build_with(notes, SearchConfig::default())
    }

    pub fn build_with(notes: &[NoteRecord], config: SearchConfig) -> Result<Self> {
        let (mode, docs) = prepare_documents(notes);
        let duplicates = notes.len() - docs.len();
        if duplicates > 0 {
            log::warn!("[SearchIndex] Skipped {} note(s) with duplicate ids", duplicates);
        }

        let text_options = TextOptions::default().set_indexing_options(
            TextFieldIndexing::default()
                .set_tokenizer(mode.tokenizer_name())
                .set_index_option(IndexRecordOption::WithFreqsAndPositions),
        );

        let mut schema_builder = Schema::builder();
        let f_id = schema_builder.add_text_field("id", STRING | STORED);
        let f_title = schema_builder.add_text_field("title", text_options.clone());
        let f_body = schema_builder.add_text_field("body", text_options.clone());
        let f_tags = schema_builder.add_text_field("tags", text_options);
        let schema = schema_builder.build();

        let index = Index::create_in_ram(schema);
        let tokenizer_manager = index.tokenizers();
        tokenizer_manager.register(CJK_UNIGRAM, CjkUnigramTokenizer);
        tokenizer_manager.register(WHITESPACE_LOWER, WhitespaceLowerTokenizer);

        if !docs.is_empty() {
            let mut writer: IndexWriter = index.writer_with_num_threads(1, WRITER_MEMORY_BYTES)?;
            for doc in &docs {
                writer.add_document(Self::to_tantivy_doc(doc, f_id, f_title, f_body, f_tags))?;
            }
            writer.commit()?;
            writer.wait_merging_threads()?;
        }

        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        log::debug!(
            "[SearchIndex] Built in-memory index: mode={:?}, documents={}",
            mode,
            docs.len()
        );

        Ok(SearchIndex {
            reader,
            mode,
            config,
            document_count: docs.len(),
            f_id,
            f_title,
            f_body,
            f_tags,
        })
    }

    fn to_tantivy_doc(
        doc: &IndexDocument,
        f_id: Field,
        f_title: Field,
        f_body: Field,
        f_tags: Field,
    ) -> TantivyDocument {
        let mut out = TantivyDocument::new();
        out.add_text(f_id, &doc.id);
        out.add_text(f_title, &doc.title);
        out.add_text(f_body, &doc.body);
        out.add_text(f_tags, &doc.tags);
        out
    }

    pub fn mode(&self) -> IndexMode {
        self.mode
    }

    pub fn document_count(&self) -> usize {
        self.document_count
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Ranked hits for a free-text query, best first.
    ///
    /// Empty or whitespace-only queries return no hits, as do queries with
    /// no indexable tokens.
    pub fn search(&self, query_str: &str) -> Result<Vec<SearchHit>> {
        let query_str = query_str.trim();
        if query_str.is_empty() || self.document_count == 0 {
            return Ok(Vec::new());
        }

        let terms = self.mode.tokenize(query_str);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let query = self.build_query(&terms);
        let searcher = self.reader.searcher();
        let top_docs = searcher.search(&query, &TopDocs::with_limit(self.document_count))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher.doc(doc_address)?;
            if let Some(id) = doc.get_first(self.f_id).and_then(|v| v.as_str()) {
                hits.push(SearchHit {
                    id: id.to_string(),
                    score,
                });
            }
        }

        Ok(hits)
    }

    /// Edit distance allowed for one query term
    fn fuzzy_distance(&self, term: &str) -> u8 {
        let fuzzy = self.config.fuzzy;
        let distance = if fuzzy >= 1.0 {
            fuzzy
        } else {
            (term.chars().count() as f32 * fuzzy).round()
        };
        distance.clamp(0.0, f32::from(MAX_FUZZY_DISTANCE)) as u8
    }

    /// Every term is OR-ed across all fields: an exact BM25 clause, a
    /// whole-term typo clause and an exact-prefix clause. The last two score
    /// `fuzzy_weight` / `prefix_weight` of the field boost.
    fn build_query(&self, terms: &[String]) -> BooleanQuery {
        let fields = [
            (self.f_title, self.config.title_boost),
            (self.f_tags, self.config.tags_boost),
            (self.f_body, self.config.body_boost),
        ];

        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
        for text in terms {
            let distance = self.fuzzy_distance(text);
            for &(field, boost) in &fields {
                let term = Term::from_field_text(field, text);

                let exact = TermQuery::new(term.clone(), IndexRecordOption::WithFreqs);
                clauses.push((Occur::Should, Box::new(BoostQuery::new(Box::new(exact), boost))));

                if distance > 0 {
                    let fuzzy = FuzzyTermQuery::new(term.clone(), distance, false);
                    let weight = boost * self.config.fuzzy_weight;
                    clauses.push((Occur::Should, Box::new(BoostQuery::new(Box::new(fuzzy), weight))));
                }

                if self.config.prefix {
                    let prefix = FuzzyTermQuery::new_prefix(term, 0, false);
                    let weight = boost * self.config.prefix_weight;
                    clauses.push((Occur::Should, Box::new(BoostQuery::new(Box::new(prefix), weight))));
                }
            }
        }

        BooleanQuery::new(clauses)
    }
}

pub fn build_index(notes: &[NoteRecord]) -> Result<SearchIndex> {
    SearchIndex::build(notes)
}

pub fn search(index: &SearchIndex, query: &str) -> Result<Vec<SearchHit>> {
    index.search(query)
}
