pub mod card;
pub mod category;
pub mod favorite;
pub mod price;
pub mod projection;
pub mod settings;
pub mod user;
pub mod viewed;
