use sea_orm::Value;
use serde::Deserialize;
use utoipa::IntoParams;

use super::empty_string_as_none;
use domain::{creator_status::CreatorStatus, Id, IntoQueryFilterMap, QueryFilterMap};

/// Search filter for `GET /creators`. Every field is optional and absent or
/// empty fields do not constrain the search.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct IndexParams {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<Uuid>)]
    pub(crate) id: Option<Id>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<Uuid>)]
    pub(crate) creator_id: Option<Id>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) status: Option<CreatorStatus>,
}

impl IntoQueryFilterMap for IndexParams {
    fn into_query_filter_map(self) -> QueryFilterMap {
        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert(
            "id".to_string(),
            self.id.map(|id| Value::Uuid(Some(Box::new(id)))),
        );
        query_filter_map.insert(
            "creator_id".to_string(),
            self.creator_id
                .map(|creator_id| Value::Uuid(Some(Box::new(creator_id)))),
        );
        query_filter_map.insert(
            "email".to_string(),
            self.email.map(|email| Value::String(Some(Box::new(email)))),
        );
        query_filter_map.insert(
            "status".to_string(),
            self.status
                .map(|status| Value::String(Some(Box::new(status.to_string())))),
        );

        query_filter_map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::Uri;

    fn parse(query: &str) -> IndexParams {
        let uri: Uri = format!("http://localhost/creators?{query}").parse().unwrap();
        Query::<IndexParams>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn empty_values_are_treated_as_absent() {
        let params = parse("id=&creator_id=&email=&status=");

        assert!(params.into_query_filter_map().is_empty());
    }

    #[test]
    fn present_values_become_filters() {
        let id = Id::new_v4();
        let params = parse(&format!("id={id}&email=a%40x.com&status=suspended"));

        let query_filter_map = params.into_query_filter_map();

        assert_eq!(query_filter_map.active_len(), 3);
        assert_eq!(
            query_filter_map.get("email"),
            Some(Value::String(Some(Box::new("a@x.com".to_string()))))
        );
        assert_eq!(
            query_filter_map.get("status"),
            Some(Value::String(Some(Box::new("suspended".to_string()))))
        );
        assert_eq!(
            query_filter_map.get("id"),
            Some(Value::Uuid(Some(Box::new(id))))
        );
    }

    #[test]
    fn unknown_status_is_rejected() {
        let uri: Uri = "http://localhost/creators?status=deleted".parse().unwrap();
        assert!(Query::<IndexParams>::try_from_uri(&uri).is_err());
    }
}
