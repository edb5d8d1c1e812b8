use super::field_ref;

pub type AuthorId = i32;
pub type BookId = i32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub(in crate::domain) id: AuthorId,
    pub(in crate::domain) name: String,
}

impl Author {
    field_ref!(name, String);

    pub fn id(&self) -> AuthorId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub(in crate::domain) id: BookId,
    pub(in crate::domain) title: String,
    pub(in crate::domain) author: Author,
}

impl Book {
    field_ref!(title, String);
    field_ref!(author, Author);

    pub fn id(&self) -> BookId {
        self.id
    }
}
