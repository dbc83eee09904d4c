diesel::table! {
    users (id) {
        id -> Text,
        name -> Text,
        password -> Text,
        permission -> BigInt,
        expired -> Bool,
        last_login -> Timestamp,
        create_time -> Timestamp,
    }
}

diesel::table! {
    category (id) {
        id -> Text,
        name -> Text,
        create_time -> Timestamp,
        create_by -> Nullable<Text>,
    }
}

diesel::table! {
    article (id) {
        id -> Text,
        title -> Text,
        text_type -> Text,
        source_text -> Text,
        content -> Nullable<Text>,
        read_count -> Integer,
        post_time -> Timestamp,
        update_time -> Timestamp,
        public -> Bool,
        is_commentable -> Bool,
        category_id -> Nullable<Text>,
        author_id -> Nullable<Text>,
    }
}

diesel::table! {
    comment (id) {
        id -> Integer,
        content -> Text,
        nickname -> Text,
        reviewed -> Bool,
        is_author -> Bool,
        create_time -> Timestamp,
        ip_address -> Nullable<Text>,
        user_id -> Nullable<Text>,
        article_id -> Text,
        reply_to -> Nullable<Integer>,
    }
}

diesel::table! {
    event (id) {
        id -> Integer,
        #[sql_name = "type"]
        kind -> Text,
        description -> Text,
        ip_address -> Nullable<Text>,
        endpoint -> Text,
        request -> Text,
        create_time -> Timestamp,
        user_id -> Nullable<Text>,
    }
}

diesel::joinable!(category -> users (create_by));
diesel::joinable!(article -> category (category_id));
diesel::joinable!(article -> users (author_id));
diesel::joinable!(comment -> article (article_id));
diesel::joinable!(comment -> users (user_id));
diesel::joinable!(event -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, category, article, comment, event);
