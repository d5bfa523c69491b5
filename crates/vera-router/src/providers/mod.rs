//! The concrete capability providers behind the router.

pub mod business;
pub mod detail;
pub mod general;
pub mod listings;
pub mod question;

pub use business::BusinessQueryProvider;
pub use detail::PropertyDetailProvider;
pub use general::GeneralChatProvider;
pub use listings::ListingSearchProvider;
pub use question::PropertyQuestionProvider;
