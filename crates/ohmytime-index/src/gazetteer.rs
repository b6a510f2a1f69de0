//! Gazetteer-backed location index.
//!
//! Loads a GeoNames TSV dump (for example `cities15000.txt`) into an in-RAM
//! tantivy index and answers query-string searches: `+term` is required,
//! `-term` excluded, `"new york"` is a phrase and the display name tolerates
//! one typo. The index is committed once and never written again.

use crate::error::IndexError;
use async_trait::async_trait;
use log::{debug, info, warn};
use ohmytime_protocol::{LocationIndex, LocationRecord, ProtocolError, RecordId};
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tantivy::collector::TopDocs;
use tantivy::query::{QueryParser, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, STORED, STRING, Schema, TEXT, Value};
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};

/// Column positions in a GeoNames row.
const COL_ID: usize = 0;
const COL_NAME: usize = 1;
const COL_ASCII_NAME: usize = 2;
const COL_ALTERNATE_NAMES: usize = 3;
const COL_COUNTRY_CODE: usize = 8;
const COL_TIMEZONE: usize = 17;
const MIN_COLUMNS: usize = COL_TIMEZONE + 1;

/// Boost applied to display name matches.
const NAME_BOOST: f32 = 2.0;
/// Edit distance tolerated on display name terms.
const NAME_FUZZY_DISTANCE: u8 = 1;
const WRITER_MEMORY_BUDGET: usize = 50_000_000;

/// Gazetteer row prepared for indexing.
#[derive(Debug, Clone)]
struct Entry {
    record: LocationRecord,
    aliases: String,
}

/// Schema field handles.
#[derive(Debug, Clone, Copy)]
struct Fields {
    id: Field,
    name: Field,
    body: Field,
    aliases: Field,
    timezone: Field,
    lang: Field,
}

impl Fields {
    fn schema() -> (Schema, Self) {
        let mut builder = Schema::builder();
        let fields = Self {
            id: builder.add_text_field("id", STRING | STORED),
            name: builder.add_text_field("name", TEXT | STORED),
            body: builder.add_text_field("body", TEXT | STORED),
            aliases: builder.add_text_field("aliases", TEXT),
            timezone: builder.add_text_field("timezone", STORED),
            lang: builder.add_text_field("lang", STORED),
        };
        (builder.build(), fields)
    }

    fn document(&self, entry: &Entry) -> TantivyDocument {
        let mut doc = TantivyDocument::new();
        doc.add_text(self.id, &entry.record.id);
        doc.add_text(self.name, &entry.record.name);
        doc.add_text(self.body, &entry.record.body);
        doc.add_text(self.aliases, &entry.aliases);
        doc.add_text(self.timezone, &entry.record.timezone);
        doc.add_text(self.lang, &entry.record.lang);
        doc
    }

    fn record(&self, doc: &TantivyDocument) -> LocationRecord {
        LocationRecord {
            id: stored_text(doc, self.id),
            name: stored_text(doc, self.name),
            body: stored_text(doc, self.body),
            timezone: stored_text(doc, self.timezone),
            lang: stored_text(doc, self.lang),
        }
    }
}

fn stored_text(doc: &TantivyDocument, field: Field) -> String {
    doc.get_first(field)
        .and_then(|value| value.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Read-only, in-memory location index.
pub struct GazetteerIndex {
    index: Index,
    reader: IndexReader,
    fields: Fields,
    search_limit: usize,
}

impl fmt::Debug for GazetteerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GazetteerIndex")
            .field("records", &self.len())
            .field("search_limit", &self.search_limit)
            .finish()
    }
}

impl GazetteerIndex {
    /// Open a gazetteer file from disk.
    pub fn open(path: impl AsRef<Path>, search_limit: usize) -> Result<Self, IndexError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IndexError::NotFound(path.to_path_buf()));
        }
        info!("loading gazetteer index (path={})", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), search_limit)
    }

    /// Build an index from GeoNames TSV rows.
    ///
    /// Rows with too few columns or without an id are skipped.
    pub fn from_reader(reader: impl BufRead, search_limit: usize) -> Result<Self, IndexError> {
        let mut entries = Vec::new();
        let mut skipped = 0usize;
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match parse_row(&line) {
                Some(entry) => entries.push(entry),
                None => {
                    skipped += 1;
                    debug!("skipping malformed gazetteer row (line={})", line_no + 1);
                }
            }
        }
        if skipped > 0 {
            warn!("skipped malformed gazetteer rows (count={})", skipped);
        }
        Self::build(entries, search_limit)
    }

    /// Build an index from already materialized records.
    pub fn from_records(
        records: impl IntoIterator<Item = LocationRecord>,
        search_limit: usize,
    ) -> Result<Self, IndexError> {
        let entries = records
            .into_iter()
            .map(|record| Entry {
                record,
                aliases: String::new(),
            })
            .collect();
        Self::build(entries, search_limit)
    }

    fn build(entries: Vec<Entry>, search_limit: usize) -> Result<Self, IndexError> {
        let (schema, fields) = Fields::schema();
        let index = Index::create_in_ram(schema);
        // Single indexing thread keeps document order equal to row order.
        let mut writer: IndexWriter = index.writer_with_num_threads(1, WRITER_MEMORY_BUDGET)?;

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.record.id.as_str()) {
                return Err(IndexError::DuplicateId(entry.record.id.clone()));
            }
            writer.add_document(fields.document(entry))?;
        }
        writer.commit()?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        let built = Self {
            index,
            reader,
            fields,
            search_limit,
        };
        info!(
            "gazetteer index ready (records={}, search_limit={})",
            built.len(),
            search_limit
        );
        Ok(built)
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.reader.searcher().num_docs() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn query_parser(&self) -> QueryParser {
        let fields = self.fields;
        let mut parser =
            QueryParser::for_index(&self.index, vec![fields.name, fields.body, fields.aliases]);
        parser.set_field_boost(fields.name, NAME_BOOST);
        parser.set_field_fuzzy(fields.name, false, NAME_FUZZY_DISTANCE, true);
        parser
    }

    /// Run a query-string search and return ranked record ids.
    ///
    /// Malformed syntax is parsed leniently rather than rejected, since queries
    /// are typed by chat users.
    pub fn search_ids(&self, query: &str) -> Result<Vec<RecordId>, IndexError> {
        if query.trim().is_empty() || self.search_limit == 0 {
            return Ok(Vec::new());
        }
        let (parsed, errors) = self.query_parser().parse_query_lenient(query);
        if !errors.is_empty() {
            debug!(
                "query parsed leniently (query={}, errors={})",
                query,
                errors.len()
            );
        }

        let searcher = self.reader.searcher();
        let mut hits = searcher.search(&parsed, &TopDocs::with_limit(self.search_limit))?;
        hits.sort_by(|left, right| right.0.total_cmp(&left.0).then(left.1.cmp(&right.1)));

        let mut ids = Vec::with_capacity(hits.len());
        for (_, address) in hits {
            let doc: TantivyDocument = searcher.doc(address)?;
            ids.push(stored_text(&doc, self.fields.id));
        }
        debug!("gazetteer search (query={}, hits={})", query, ids.len());
        Ok(ids)
    }

    /// Fetch a record by id.
    pub fn get(&self, id: &str) -> Result<Option<LocationRecord>, IndexError> {
        let searcher = self.reader.searcher();
        let query = TermQuery::new(
            Term::from_field_text(self.fields.id, id),
            IndexRecordOption::Basic,
        );
        let Some((_, address)) = searcher
            .search(&query, &TopDocs::with_limit(1))?
            .into_iter()
            .next()
        else {
            return Ok(None);
        };
        let doc: TantivyDocument = searcher.doc(address)?;
        Ok(Some(self.fields.record(&doc)))
    }
}

#[async_trait]
impl LocationIndex for GazetteerIndex {
    async fn search(&self, query: &str) -> Result<Vec<RecordId>, ProtocolError> {
        self.search_ids(query)
            .map_err(|err| ProtocolError::IndexUnavailable(err.to_string()))
    }

    async fn fetch(&self, id: &str) -> Result<LocationRecord, ProtocolError> {
        match self.get(id) {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(ProtocolError::RecordNotFound(id.to_string())),
            Err(err) => Err(ProtocolError::IndexUnavailable(err.to_string())),
        }
    }
}

/// Parse one GeoNames row; the country code doubles as region and language tag.
fn parse_row(line: &str) -> Option<Entry> {
    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() < MIN_COLUMNS || columns[COL_ID].trim().is_empty() {
        return None;
    }
    let country = columns[COL_COUNTRY_CODE].trim().to_string();
    let name = match columns[COL_ASCII_NAME].trim() {
        "" => columns[COL_NAME].trim(),
        ascii => ascii,
    };
    Some(Entry {
        record: LocationRecord {
            id: columns[COL_ID].trim().to_string(),
            name: name.to_string(),
            body: country.clone(),
            timezone: columns[COL_TIMEZONE].trim().to_string(),
            lang: country,
        },
        aliases: format!(
            "{} {}",
            columns[COL_NAME], columns[COL_ALTERNATE_NAMES]
        ),
    })
}
