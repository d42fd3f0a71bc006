//! Static reference data served by the API: the listed companies and the news feed.

use crate::types::{Company, Impact, NewsCategory, NewsItem};

fn company(
    id: u32,
    name: &str,
    symbol: &str,
    sector: &str,
    market_cap: &str,
    pe: f64,
    dividend: f64,
) -> Company {
    Company {
        id,
        name: name.to_string(),
        symbol: symbol.to_string(),
        sector: sector.to_string(),
        market_cap: Some(market_cap.to_string()),
        pe: Some(pe),
        dividend: Some(dividend),
    }
}

pub fn companies() -> Vec<Company> {
    vec![
        company(1, "Apple Inc.", "AAPL", "Technology", "$2.8T", 28.5, 0.53),
        company(2, "Microsoft Corp.", "MSFT", "Technology", "$2.5T", 32.1, 0.68),
        company(3, "Amazon.com Inc.", "AMZN", "Consumer Discretionary", "$1.3T", 45.2, 0.0),
        company(4, "Alphabet Inc.", "GOOGL", "Technology", "$1.7T", 24.8, 0.0),
        company(5, "Tesla Inc.", "TSLA", "Consumer Discretionary", "$789B", 65.3, 0.0),
        company(6, "Meta Platforms Inc.", "META", "Technology", "$756B", 22.9, 0.5),
        company(7, "NVIDIA Corp.", "NVDA", "Technology", "$1.0T", 71.2, 0.16),
        company(8, "Berkshire Hathaway", "BRK.B", "Financial Services", "$768B", 8.9, 0.0),
        company(9, "Johnson & Johnson", "JNJ", "Healthcare", "$428B", 15.7, 2.95),
        company(10, "JPMorgan Chase & Co.", "JPM", "Financial Services", "$456B", 12.4, 4.0),
        company(11, "Procter & Gamble Co.", "PG", "Consumer Staples", "$347B", 24.1, 3.65),
        company(12, "Visa Inc.", "V", "Financial Services", "$498B", 31.8, 1.8),
    ]
}

pub fn market_news() -> Vec<NewsItem> {
    vec![
        NewsItem {
            id: 1,
            title: "Federal Reserve Signals Potential Rate Changes",
            summary: "The Fed indicates possible monetary policy adjustments in response to current economic indicators.",
            source: "Financial Times",
            timestamp: "2 hours ago",
            category: NewsCategory::Economic,
            impact: Impact::High,
        },
        NewsItem {
            id: 2,
            title: "Tech Sector Shows Strong Q4 Performance",
            summary: "Major technology companies report better-than-expected earnings for the fourth quarter.",
            source: "Reuters",
            timestamp: "4 hours ago",
            category: NewsCategory::Tech,
            impact: Impact::Medium,
        },
        NewsItem {
            id: 3,
            title: "Oil Prices Surge on Supply Concerns",
            summary: "Crude oil futures climb as geopolitical tensions raise supply disruption fears.",
            source: "Bloomberg",
            timestamp: "6 hours ago",
            category: NewsCategory::Market,
            impact: Impact::High,
        },
        NewsItem {
            id: 4,
            title: "Electric Vehicle Sales Hit Record High",
            summary: "EV manufacturers report unprecedented sales figures, driving stock prices higher.",
            source: "Wall Street Journal",
            timestamp: "8 hours ago",
            category: NewsCategory::Company,
            impact: Impact::Medium,
        },
        NewsItem {
            id: 5,
            title: "Inflation Data Beats Expectations",
            summary: "Latest CPI figures come in lower than anticipated, boosting market sentiment.",
            source: "CNBC",
            timestamp: "12 hours ago",
            category: NewsCategory::Economic,
            impact: Impact::High,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::quotes::BASE_QUOTES;
    use std::collections::HashSet;

    #[test]
    fn ids_and_symbols_are_unique() {
        let list = companies();
        let ids: HashSet<_> = list.iter().map(|c| c.id).collect();
        let symbols: HashSet<_> = list.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(ids.len(), list.len());
        assert_eq!(symbols.len(), list.len());
    }

    #[test]
    fn every_company_has_a_base_quote() {
        for c in companies() {
            assert!(
                BASE_QUOTES.iter().any(|(s, ..)| *s == c.symbol),
                "no quote for {}",
                c.symbol
            );
        }
    }

    #[test]
    fn news_feed_is_newest_first() {
        let news = market_news();
        assert_eq!(news.len(), 5);
        assert_eq!(news[0].source, "Financial Times");
        assert_eq!(news[4].timestamp, "12 hours ago");
    }
}
