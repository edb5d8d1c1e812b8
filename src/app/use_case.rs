pub mod catalog {
    use sqlx::PgPool;

    use crate::{
        app::resource::catalog::{AuthorResponse, BookResponse},
        domain::datatype::BookFilter,
        error::{
            app::ApplicationError,
            persistence::PersistenceError,
            resource::{ValidationError, ValidationErrorKind, ValidationFieldError},
        },
        infra::database::repository,
    };

    pub(crate) mod validation {
        use super::*;

        pub fn list_books(filter: &BookFilter) -> Result<(), ValidationError<BookFilter>> {
            let mut errors = Vec::new();

            if let Some(limit) = filter.limit {
                if limit < 0 {
                    errors.push(ValidationFieldError::from_resource(
                        &limit,
                        "/limit".into(),
                        vec![ValidationErrorKind::Minimum(0)],
                    ));
                }
            }

            for (idx, id) in filter.author_ids.iter().enumerate() {
                if *id <= 0 {
                    errors.push(ValidationFieldError::from_resource(
                        id,
                        format!("/authorIds/{idx}"),
                        vec![ValidationErrorKind::Positive],
                    ));
                }
            }

            if !errors.is_empty() {
                return Err(ValidationError::from_resource(filter.clone(), errors));
            }

            Ok(())
        }
    }

    pub async fn list_books(
        pool: &PgPool,
        filter: BookFilter,
    ) -> Result<Vec<BookResponse>, ApplicationError<BookFilter>> {
        validation::list_books(&filter)?;

        if filter.limit == Some(0) {
            return Ok(Vec::new());
        }

        let books = repository::find_books(pool, &filter).await?;
        tracing::debug!(count = books.len(), "books selected");

        Ok(books.into_iter().map(BookResponse::from).collect())
    }

    pub async fn list_authors(pool: &PgPool) -> Result<Vec<AuthorResponse>, PersistenceError> {
        let authors = repository::find_authors(pool).await?;
        Ok(authors.into_iter().map(AuthorResponse::from).collect())
    }

    #[cfg(test)]
    mod test {
        use pretty_assertions::assert_eq;

        use super::*;

        #[test]
        fn accept_empty_filter() {
            assert!(validation::list_books(&BookFilter::default()).is_ok());
        }

        #[test]
        fn accept_zero_limit() {
            let filter = BookFilter {
                limit: Some(0),
                ..Default::default()
            };
            assert!(validation::list_books(&filter).is_ok());
        }

        #[test]
        fn reject_negative_limit_and_author_ids() {
            let filter = BookFilter {
                author_ids: vec![3, -1, 0],
                search: None,
                limit: Some(-5),
            };

            let err = validation::list_books(&filter).unwrap_err();

            assert_eq!(err.resource_type, "catalog::BookFilter");
            assert_eq!(
                err.fields
                    .iter()
                    .map(|field| field.path.as_str())
                    .collect::<Vec<_>>(),
                vec!["/limit", "/authorIds/1", "/authorIds/2"]
            );
            assert_eq!(err.fields[0].kinds, vec![ValidationErrorKind::Minimum(0)]);
            assert_eq!(err.fields[0].value, "-5");
            assert_eq!(err.fields[1].kinds, vec![ValidationErrorKind::Positive]);
        }
    }
}
