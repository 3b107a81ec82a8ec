use std::collections::HashMap;

use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, BoostQuery, FuzzyTermQuery, Occur, Query, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Value};
use tantivy::tokenizer::TokenStream;
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use tracing::{debug, info};

use twinchat_core::error::{Error, Result};
use twinchat_core::types::{IndexItem, ItemId};

use crate::tantivy_utils::{build_schema, register_tokenizer};

/// Weight of a term matched through prefix expansion, relative to an exact hit.
pub const PREFIX_WEIGHT: f32 = 0.375;
/// Weight of a term matched within the fuzzy edit distance.
pub const FUZZY_WEIGHT: f32 = 0.45;
/// Largest edit distance the Levenshtein automata support.
const MAX_EDIT_DISTANCE: u8 = 2;

/// In-memory lexical index over the snippet corpus.
///
/// Built once from the loaded embedding index and queried read-only after
/// that; `query` never mutates the underlying tantivy index.
pub struct KeywordScorer {
	index: Index,
	reader: IndexReader,
	id_field: Field,
	text_field: Field,
	fuzziness: f32,
	num_docs: usize,
}

impl KeywordScorer {
	pub fn build(items: &[IndexItem], fuzziness: f32) -> Result<Self> {
		Self::try_build(items, fuzziness).map_err(|e| Error::Keyword(e.to_string()))
	}

	fn try_build(items: &[IndexItem], fuzziness: f32) -> anyhow::Result<Self> {
		let schema = build_schema();
		let index = Index::create_in_ram(schema.clone());
		register_tokenizer(&index);
		let id_field = schema.get_field("id")?;
		let text_field = schema.get_field("text")?;

		let mut writer: IndexWriter = index.writer_with_num_threads(1, 50_000_000)?;
		for item in items {
			writer.add_document(doc!(
				id_field => item.id.clone(),
				text_field => item.text.clone(),
			))?;
		}
		writer.commit()?;

		let reader: IndexReader = index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into()?;
		info!("🔎 Built keyword index over {} items", items.len());
		Ok(Self { index, reader, id_field, text_field, fuzziness, num_docs: items.len() })
	}

	pub fn len(&self) -> usize { self.num_docs }

	pub fn is_empty(&self) -> bool { self.num_docs == 0 }

	/// Score every item that lexically matches `text`.
	///
	/// Items without any exact, prefix or fuzzy term hit are absent from the
	/// returned map.
	pub fn query(&self, text: &str) -> Result<HashMap<ItemId, f32>> {
		self.try_query(text).map_err(|e| Error::Keyword(e.to_string()))
	}

	fn try_query(&self, text: &str) -> anyhow::Result<HashMap<ItemId, f32>> {
		let mut scores = HashMap::new();
		if self.num_docs == 0 { return Ok(scores); }
		let terms = self.analyze(text)?;
		if terms.is_empty() { return Ok(scores); }

		let query = self.build_query(&terms);
		let searcher = self.reader.searcher();
		let top_docs = searcher.search(&query, &TopDocs::with_limit(self.num_docs))?;
		for (score, addr) in top_docs {
			let doc: TantivyDocument = searcher.doc(addr)?;
			let id = doc.get_first(self.id_field).and_then(|v| v.as_str()).unwrap_or("").to_string();
			scores.entry(id).and_modify(|s: &mut f32| *s = s.max(score)).or_insert(score);
		}
		debug!(terms = ?terms, hits = scores.len(), "keyword query");
		Ok(scores)
	}

	/// Run the corpus analyzer over the query so both sides agree on terms.
	fn analyze(&self, text: &str) -> anyhow::Result<Vec<String>> {
		let mut analyzer = self.index.tokenizer_for_field(self.text_field)?;
		let mut stream = analyzer.token_stream(text);
		let mut terms: Vec<String> = Vec::new();
		while stream.advance() {
			let token = stream.token().text.clone();
			if !token.is_empty() && !terms.contains(&token) { terms.push(token); }
		}
		Ok(terms)
	}

	fn build_query(&self, terms: &[String]) -> BooleanQuery {
		let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
		for t in terms {
			let term = Term::from_field_text(self.text_field, t);
			clauses.push((Occur::Should, Box::new(TermQuery::new(term.clone(), IndexRecordOption::WithFreqs))));
			let prefix = FuzzyTermQuery::new_prefix(term.clone(), 0, true);
			clauses.push((Occur::Should, Box::new(BoostQuery::new(Box::new(prefix), PREFIX_WEIGHT))));
			let distance = fuzzy_distance(t, self.fuzziness);
			if distance > 0 {
				let fuzzy = FuzzyTermQuery::new(term, distance, true);
				clauses.push((Occur::Should, Box::new(BoostQuery::new(Box::new(fuzzy), FUZZY_WEIGHT))));
			}
		}
		BooleanQuery::new(clauses)
	}
}

/// Edit distance allowed for `term`: a fraction of its length, capped.
pub fn fuzzy_distance(term: &str, fuzziness: f32) -> u8 {
	if fuzziness <= 0.0 { return 0; }
	let len = term.chars().count() as f32;
	let d = (len * fuzziness).round();
	if d >= f32::from(MAX_EDIT_DISTANCE) { MAX_EDIT_DISTANCE } else { d as u8 }
}
