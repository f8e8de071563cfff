pub(crate) mod compare_list_queries;
pub(crate) mod group_queries;
pub(crate) mod member_queries;
pub(crate) mod news_queries;
pub(crate) mod price_queries;
pub(crate) mod stock_issue_queries;
pub(crate) mod user_queries;
