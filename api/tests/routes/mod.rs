mod auth_test;
mod contests_test;
mod explore_test;
mod submissions_test;
