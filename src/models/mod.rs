mod compare_list;
mod group;
mod news_item;
mod price_record;
mod stock_issue;
pub mod chart;

pub use chart::{
    ChartMarker, ChartParams, ChartResponse, ChartVariant, DerivedSeries, DerivedSeriesPoint,
    IndicatorKey, SelectedIndicators, SeriesMode, ZoomWindow,
};
pub use compare_list::{
    AddCompareListItemRequest, CompareList, CompareListDetailResponse, CompareListItem,
    CompareListItemDetail, CreateCompareListRequest, UpdateCompareListRequest,
};
pub use group::{
    AccountRole, AddGroupMemberRequest, CreateGroupRequest, Group, GroupMember,
    GroupMemberDetail, GroupResponse, GroupRole, UpdateGroupMemberRequest, UpdateGroupRequest,
    User,
};
pub use news_item::{
    Article, ArticleSource, CreateGroupEventRequest, GroupEvent, ImpactScores, NewsCategory,
    NewsItem, NewsQueryParams, UpdateGroupEventRequest,
};
pub use price_record::{PriceRangeParams, PriceRecord};
pub use stock_issue::{StockIssue, StockIssueSearchParams, StockIssueSearchResponse};
