pub mod m202512010001_create_users;
pub mod m202512010002_create_contests;
pub mod m202512010003_create_participations;
