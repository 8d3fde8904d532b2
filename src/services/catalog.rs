/// Catalog store
///
/// Holds the fixed set of recommendable movies, loaded once at startup from a
/// columnar JSON snapshot (the shape a dataframe's `to_dict()` produces):
///
/// ```json
/// { "movie_id": { "0": 19995, "1": 285 }, "title": { "0": "Avatar", "1": "Spectre" } }
/// ```
///
/// Columns may also be plain arrays. Extra columns are ignored.
use crate::{
    error::{LoadError, LoadResult},
    models::{Movie, MovieId},
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Names of the snapshot columns the store reads
#[derive(Debug, Clone)]
pub struct CatalogColumns {
    pub id: String,
    pub title: String,
}

impl Default for CatalogColumns {
    fn default() -> Self {
        Self {
            id: "movie_id".to_string(),
            title: "title".to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Column {
    Sequence(Vec<Value>),
    Labelled(BTreeMap<String, Value>),
}

#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    movies: Vec<Movie>,
}

impl CatalogStore {
    /// Reads and parses a catalog snapshot from disk
    pub fn load(path: impl AsRef<Path>, columns: &CatalogColumns) -> LoadResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let store = Self::from_json(&json, columns)?;

        tracing::info!(
            path = %path.display(),
            movies = store.len(),
            "Loaded catalog snapshot"
        );

        Ok(store)
    }

    /// Parses a columnar JSON snapshot
    pub fn from_json(json: &str, columns: &CatalogColumns) -> LoadResult<Self> {
        let mut table: Map<String, Value> = serde_json::from_str(json)?;

        let ids = take_column(&mut table, &columns.id)?;
        let titles = take_column(&mut table, &columns.title)?;

        if ids.len() != titles.len() {
            return Err(LoadError::RaggedColumns {
                column: columns.title.clone(),
                expected: ids.len(),
                actual: titles.len(),
            });
        }

        let mut movies = Vec::with_capacity(ids.len());
        for (row_index, ((id_label, id), (title_label, title))) in
            ids.into_iter().zip(titles).enumerate()
        {
            if id_label != title_label {
                return Err(LoadError::InvalidRowLabel(title_label.to_string()));
            }

            let movie_id = parse_movie_id(&columns.id, row_index, id)?;
            let title = parse_title(&columns.title, row_index, title)?;
            movies.push(Movie::new(row_index, movie_id, title));
        }

        Ok(Self { movies })
    }

    /// Builds a store directly from `(id, title)` pairs in row order
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (MovieId, S)>,
        S: Into<String>,
    {
        let movies = entries
            .into_iter()
            .enumerate()
            .map(|(row_index, (id, title))| Movie::new(row_index, id, title))
            .collect();
        Self { movies }
    }

    /// Index of the first movie whose title matches exactly
    pub fn resolve_index(&self, title: &str) -> Option<usize> {
        self.movies.iter().position(|movie| movie.title == title)
    }

    /// Movie at `index`
    ///
    /// # Panics
    /// Panics if `index >= self.len()`. Indices only ever come from the
    /// similarity index, which is validated against the catalog at load time.
    pub fn get(&self, index: usize) -> &Movie {
        &self.movies[index]
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Movie> {
        self.movies.iter()
    }

}

/// Removes a column from the table and returns its `(label, value)` cells in row order
fn take_column(table: &mut Map<String, Value>, name: &str) -> LoadResult<Vec<(usize, Value)>> {
    let raw = table
        .remove(name)
        .ok_or_else(|| LoadError::MissingColumn(name.to_string()))?;

    match serde_json::from_value::<Column>(raw)? {
        Column::Sequence(values) => Ok(values.into_iter().enumerate().collect()),
        Column::Labelled(cells) => {
            let mut rows = cells
                .into_iter()
                .map(|(label, value)| {
                    label
                        .parse::<usize>()
                        .map(|row| (row, value))
                        .map_err(|_| LoadError::InvalidRowLabel(label))
                })
                .collect::<LoadResult<Vec<_>>>()?;
            // BTreeMap orders labels as strings ("10" < "2"); row order is numeric
            rows.sort_by_key(|(row, _)| *row);
            // "1" and "01" name the same row
            if let Some(pair) = rows.windows(2).find(|pair| pair[0].0 == pair[1].0) {
                return Err(LoadError::DuplicateRowLabel(pair[1].0));
            }
            Ok(rows)
        }
    }
}

fn parse_movie_id(column: &str, row: usize, value: Value) -> LoadResult<MovieId> {
    let id = match &value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f < u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    id.map(MovieId).ok_or_else(|| LoadError::InvalidValue {
        column: column.to_string(),
        row,
        value: value.to_string(),
    })
}

fn parse_title(column: &str, row: usize, value: Value) -> LoadResult<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(LoadError::InvalidValue {
            column: column.to_string(),
            row,
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn columns() -> CatalogColumns {
        CatalogColumns::default()
    }

    #[test]
    fn test_load_labelled_columns() {
        let json = r#"{
            "movie_id": {"0": 19995, "1": 285, "2": 206647},
            "title": {"0": "Avatar", "1": "Pirates of the Caribbean: At World's End", "2": "Spectre"},
            "tags": {"0": "action adventure", "1": "ocean pirate", "2": "spy"}
        }"#;

        let store = CatalogStore::from_json(json, &columns()).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(2), &Movie::new(2, MovieId(206647), "Spectre"));
    }

    #[test]
    fn test_labelled_rows_ordered_numerically() {
        let mut ids = Map::new();
        let mut titles = Map::new();
        for row in 0..12u64 {
            ids.insert(row.to_string(), Value::from(1000 + row));
            titles.insert(row.to_string(), Value::from(format!("Movie {}", row)));
        }
        let json = serde_json::json!({ "movie_id": ids, "title": titles }).to_string();

        let store = CatalogStore::from_json(&json, &columns()).unwrap();
        let order: Vec<u64> = store.iter().map(|m| m.movie_id.0).collect();
        assert_eq!(order, (1000..1012).collect::<Vec<_>>());
        assert_eq!(store.get(10).title, "Movie 10");
    }

    #[test]
    fn test_load_sequence_columns() {
        let json = r#"{"movie_id": [1, "2", 3.0], "title": ["A", "B", "C"]}"#;
        let store = CatalogStore::from_json(json, &columns()).unwrap();
        let ids: Vec<MovieId> = store.iter().map(|m| m.movie_id).collect();
        assert_eq!(ids, vec![MovieId(1), MovieId(2), MovieId(3)]);
    }

    #[test]
    fn test_custom_column_names() {
        let json = r#"{"id": [7, 8], "name": ["Seven", "Eight"]}"#;
        let columns = CatalogColumns {
            id: "id".to_string(),
            title: "name".to_string(),
        };
        let store = CatalogStore::from_json(json, &columns).unwrap();
        assert_eq!(store.resolve_index("Eight"), Some(1));
    }

    #[test]
    fn test_missing_title_column() {
        let json = r#"{"movie_id": [1, 2]}"#;
        let err = CatalogStore::from_json(json, &columns()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "title"));
    }

    #[test]
    fn test_ragged_columns() {
        let json = r#"{"movie_id": [1, 2, 3], "title": ["A", "B"]}"#;
        let err = CatalogStore::from_json(json, &columns()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::RaggedColumns {
                expected: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_row_label() {
        let json = r#"{"movie_id": {"a": 1}, "title": {"a": "A"}}"#;
        let err = CatalogStore::from_json(json, &columns()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidRowLabel(_)));
    }

    #[test]
    fn test_mismatched_row_labels() {
        let json = r#"{"movie_id": {"0": 1, "1": 2}, "title": {"0": "A", "2": "C"}}"#;
        let err = CatalogStore::from_json(json, &columns()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidRowLabel(ref l) if l == "2"));
    }

    #[test]
    fn test_duplicate_row_labels_rejected() {
        let json = r#"{"movie_id": {"1": 10, "01": 11}, "title": {"1": "A", "01": "B"}}"#;
        let err = CatalogStore::from_json(json, &columns()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateRowLabel(1)));
    }

    #[test]
    fn test_movie_id_beyond_u64_rejected() {
        let json = r#"{"movie_id": [18446744073709551616.0], "title": ["Overflow"]}"#;
        let err = CatalogStore::from_json(json, &columns()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { row: 0, .. }));

        let store = CatalogStore::from_json(r#"{"movie_id": [19995.0], "title": ["Avatar"]}"#, &columns())
            .unwrap();
        assert_eq!(store.get(0).movie_id, MovieId(19995));
    }

    #[test]
    fn test_invalid_movie_id() {
        let json = r#"{"movie_id": [1, -4], "title": ["A", "B"]}"#;
        let err = CatalogStore::from_json(json, &columns()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { row: 1, .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = CatalogStore::from_json("[1, 2, 3]", &columns()).unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn test_resolve_index_exact_and_first_match() {
        let store = CatalogStore::from_entries(vec![
            (MovieId(1), "The Thing"),
            (MovieId(2), "Heat"),
            (MovieId(3), "The Thing"),
        ]);

        assert_eq!(store.resolve_index("The Thing"), Some(0));
        assert_eq!(store.resolve_index("Heat"), Some(1));
        assert_eq!(store.resolve_index("heat"), None);
        assert_eq!(store.resolve_index("The Thin"), None);
    }

    #[test]
    #[should_panic]
    fn test_get_out_of_range_panics() {
        let store = CatalogStore::from_entries(vec![(MovieId(1), "Only")]);
        store.get(1);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"movie_id": [11, 12], "title": ["Star Wars", "Finding Nemo"]}}"#)
            .unwrap();

        let store = CatalogStore::load(file.path(), &columns()).unwrap();
        let titles: Vec<&str> = store.iter().map(|movie| movie.title.as_str()).collect();
        assert_eq!(titles, vec!["Star Wars", "Finding Nemo"]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = CatalogStore::load("/nonexistent/movie_dict.json", &columns()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
