pub mod config;
pub mod contact;
pub mod debounce;
pub mod dom;
pub mod feed;
pub mod listing;
pub mod model;
pub mod nav;
pub mod page;
pub mod palette;
pub mod scroll_spy;
