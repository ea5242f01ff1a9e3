pub mod page_cache;
