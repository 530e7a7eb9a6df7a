//! GROQ queries issued against the content store

/// Every post's id and slug
pub const POST_PATHS: &str = r#"*[_type == "post"]{
    _id,
    slug {
        current
    }
}"#;

/// One post by `$slug`, with its author expanded and approved comments attached
pub const POST_BY_SLUG: &str = r#"*[_type == "post" && slug.current == $slug][0]{
    _id,
    _createdAt,
    title,
    description,
    mainImage,
    author->{name, image},
    slug,
    body,
    'comments': *[
        _type == "comment" &&
        post._ref == ^._id &&
        approved == true
    ]
}"#;
