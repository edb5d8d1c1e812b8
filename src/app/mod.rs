pub mod resource;
pub mod use_case;

pub mod transform {
    pub mod catalog {
        use crate::{
            app::resource::catalog::{AuthorResponse, BookResponse},
            domain::entity::catalog::{Author, Book},
        };

        impl From<Author> for AuthorResponse {
            fn from(author: Author) -> Self {
                Self {
                    id: author.id(),
                    name: author.name().clone(),
                }
            }
        }

        impl From<Book> for BookResponse {
            fn from(book: Book) -> Self {
                Self {
                    id: book.id(),
                    title: book.title().clone(),
                    author: book.author().clone().into(),
                }
            }
        }
    }
}
