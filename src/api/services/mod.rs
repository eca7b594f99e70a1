pub mod admin;
pub mod helpers;
pub mod pages;
pub mod redirect;

pub use redirect::RedirectService;
