pub mod catalog {
    use async_graphql::SimpleObject;
    use serde::Serialize;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
    #[graphql(name = "Author")]
    pub struct AuthorResponse {
        pub id: i32,
        pub name: String,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
    #[graphql(name = "Book")]
    pub struct BookResponse {
        pub id: i32,
        pub title: String,
        pub author: AuthorResponse,
    }
}

pub mod health {
    use serde::Serialize;

    #[derive(Debug, Clone, Serialize)]
    pub struct HealthResponse {
        pub status: &'static str,
    }

    impl HealthResponse {
        pub fn ok() -> Self {
            Self { status: "ok" }
        }
    }
}
