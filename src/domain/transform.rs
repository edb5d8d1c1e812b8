use sqlx::{postgres::PgRow, Row};

use super::entity::catalog::{Author, Book};

impl TryFrom<&PgRow> for Author {
    type Error = sqlx::Error;

    fn try_from(row: &PgRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("author_id")?,
            name: row.try_get("author_name")?,
        })
    }
}

impl TryFrom<&PgRow> for Book {
    type Error = sqlx::Error;

    fn try_from(row: &PgRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("book_id")?,
            title: row.try_get("book_title")?,
            author: row.try_into()?,
        })
    }
}
