//! News feed port.

use crate::domain::error::SilvertraderError;
use crate::domain::news::NewsItem;

pub trait NewsPort {
    fn fetch_news(&self) -> Result<Vec<NewsItem>, SilvertraderError>;
}
