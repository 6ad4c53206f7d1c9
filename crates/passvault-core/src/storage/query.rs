//! Lazy, restartable record queries.

use crate::storage::types::Record;

/// Records matching a predicate, evaluated on demand.
///
/// A query borrows the store, so it can never observe a mutation. Each
/// call to [`Query::iter`] starts a fresh pass over the records.
pub struct Query<'a, P> {
    records: &'a [Record],
    predicate: P,
}

impl<'a, P> Query<'a, P>
where
    P: Fn(&Record) -> bool,
{
    pub(crate) fn new(records: &'a [Record], predicate: P) -> Self {
        Self { records, predicate }
    }

    pub fn iter(&self) -> QueryIter<'_, 'a, P> {
        QueryIter {
            inner: self.records.iter(),
            predicate: &self.predicate,
        }
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn first(&self) -> Option<&'a Record> {
        self.iter().next()
    }

    pub fn is_empty(&self) -> bool {
        self.first().is_none()
    }
}

impl<'q, 'a, P> IntoIterator for &'q Query<'a, P>
where
    P: Fn(&Record) -> bool,
{
    type Item = &'a Record;
    type IntoIter = QueryIter<'q, 'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One pass over a [`Query`].
pub struct QueryIter<'q, 'a, P> {
    inner: std::slice::Iter<'a, Record>,
    predicate: &'q P,
}

impl<'a, P> Iterator for QueryIter<'_, 'a, P>
where
    P: Fn(&Record) -> bool,
{
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        let predicate = self.predicate;
        self.inner.find(|record| predicate(*record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::storage::types::{NewRecord, RecordKind};

    fn records() -> Vec<Record> {
        ["alpha", "beta", "gamma"]
            .iter()
            .map(|name| Record::create(NewRecord::new(RecordKind::Note, *name)).unwrap())
            .collect()
    }

    #[test]
    fn test_query_is_restartable() {
        let records = records();
        let query = Query::new(&records, |r: &Record| r.name() != "beta");

        let first: Vec<&str> = query.iter().map(|r| r.name()).collect();
        let second: Vec<&str> = (&query).into_iter().map(|r| r.name()).collect();

        assert_eq!(first, vec!["alpha", "gamma"]);
        assert_eq!(first, second);
        assert_eq!(query.count(), 2);
    }

    #[test]
    fn test_query_is_lazy() {
        let records = records();
        let calls = Cell::new(0);
        let query = Query::new(&records, |_: &Record| {
            calls.set(calls.get() + 1);
            true
        });
        assert_eq!(calls.get(), 0);

        assert_eq!(query.first().unwrap().name(), "alpha");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_empty_query() {
        let records = records();
        let query = Query::new(&records, |_: &Record| false);
        assert!(query.is_empty());
        assert_eq!(query.iter().count(), 0);
    }
}
