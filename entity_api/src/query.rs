use crate::error::Error;
use sea_orm::strum::IntoEnumIterator;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Value};
use std::collections::HashMap;

/// `QueryFilterMap` carries filter parameters from the web layer down to the
/// database query layer. Keys are column names, values are optional `sea_orm` values.
/// A key mapped to `None` (or not present at all) does not constrain the query.
///
/// # Example
///
/// ```
/// use sea_orm::Value;
/// use entity_api::query::QueryFilterMap;
///
/// let mut query_filter_map = QueryFilterMap::new();
/// query_filter_map.insert("email".to_string(), Some(Value::String(Some(Box::new("a@x.com".to_string())))));
/// assert!(query_filter_map.get("email").is_some());
/// assert!(query_filter_map.get("status").is_none());
/// ```
#[derive(Debug, Default)]
pub struct QueryFilterMap {
    map: HashMap<String, Option<Value>>,
}

impl QueryFilterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        // HashMap.get returns an Option and so we need to "flatten" this to a single Option
        self.map
            .get(key)
            .and_then(|inner_option| inner_option.clone())
    }

    pub fn insert(&mut self, key: String, value: Option<Value>) {
        self.map.insert(key, value);
    }

    /// Number of keys that will actually constrain a query.
    pub fn active_len(&self) -> usize {
        self.map.values().filter(|value| value.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_len() == 0
    }
}

/// Converts a typed parameter struct into a `QueryFilterMap`.
///
/// # Example
///
/// ```
/// use entity_api::query::{IntoQueryFilterMap, QueryFilterMap};
///
/// struct ByEmail {
///     email: Option<String>,
/// }
///
/// impl IntoQueryFilterMap for ByEmail {
///     fn into_query_filter_map(self) -> QueryFilterMap {
///         let mut query_filter_map = QueryFilterMap::new();
///         query_filter_map.insert(
///             "email".to_string(),
///             self.email.map(|email| sea_orm::Value::String(Some(Box::new(email)))),
///         );
///         query_filter_map
///     }
/// }
/// ```
pub trait IntoQueryFilterMap {
    fn into_query_filter_map(self) -> QueryFilterMap;
}

impl IntoQueryFilterMap for QueryFilterMap {
    fn into_query_filter_map(self) -> QueryFilterMap {
        self
    }
}

/// Find all records of an entity by the given query filter map.
pub async fn find_by<E, C>(
    db: &DatabaseConnection,
    query_filter_map: QueryFilterMap,
) -> Result<Vec<E::Model>, Error>
where
    E: EntityTrait,
    C: ColumnTrait + IntoEnumIterator,
{
    let mut query = E::find();

    // We iterate through the entity's defined columns so that we only attempt
    // to filter by columns that exist.
    for column in C::iter() {
        if let Some(value) = query_filter_map.get(&column.to_string()) {
            query = query.filter(column.eq(value));
        }
    }

    Ok(query.all(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_values_do_not_count_as_active_filters() {
        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert("email".to_string(), None);
        query_filter_map.insert(
            "status".to_string(),
            Some(Value::String(Some(Box::new("active".to_string())))),
        );

        assert_eq!(query_filter_map.active_len(), 1);
        assert!(query_filter_map.get("email").is_none());
        assert!(!query_filter_map.is_empty());
    }

    #[test]
    fn new_map_is_empty() {
        assert!(QueryFilterMap::new().is_empty());
    }
}
