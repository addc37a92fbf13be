// URL builders for the Riot endpoints the scout uses.
// Platform hosts look like `euw1`, regional hosts like `europe`.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub const DATA_DRAGON_BASE: &str = "https://ddragon.leagueoflegends.com";

/// Filters for the match-id list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchQuery {
    pub count: usize,
    pub queue: Option<u32>,
    pub start_time: Option<i64>,
}

fn platform(region: &str) -> String {
    format!("https://{}.api.riotgames.com", region)
}

fn regional(routing: &str) -> String {
    format!("https://{}.api.riotgames.com", routing)
}

pub fn account_by_riot_id(routing: &str, game_name: &str, tag_line: &str) -> String {
    format!(
        "{}/riot/account/v1/accounts/by-riot-id/{}/{}",
        regional(routing),
        encode_path(game_name),
        encode_path(tag_line)
    )
}

pub fn account_by_puuid(routing: &str, puuid: &str) -> String {
    format!("{}/riot/account/v1/accounts/by-puuid/{}", regional(routing), puuid)
}

pub fn league_entries(region: &str, puuid: &str) -> String {
    format!("{}/lol/league/v4/entries/by-puuid/{}", platform(region), puuid)
}

pub fn top_masteries(region: &str, puuid: &str, count: usize) -> String {
    format!(
        "{}/lol/champion-mastery/v4/champion-masteries/by-puuid/{}/top?count={}",
        platform(region),
        puuid,
        count
    )
}

pub fn match_ids(routing: &str, puuid: &str, query: &MatchQuery) -> String {
    let mut url = format!(
        "{}/lol/match/v5/matches/by-puuid/{}/ids?type=ranked&start=0&count={}",
        regional(routing),
        puuid,
        query.count.min(100)
    );
    if let Some(queue) = query.queue {
        url.push_str(&format!("&queue={}", queue));
    }
    if let Some(start_time) = query.start_time {
        url.push_str(&format!("&startTime={}", start_time));
    }
    url
}

pub fn match_by_id(routing: &str, match_id: &str) -> String {
    format!("{}/lol/match/v5/matches/{}", regional(routing), match_id)
}

pub fn clash_players(region: &str, puuid: &str) -> String {
    format!("{}/lol/clash/v1/players/by-puuid/{}", platform(region), puuid)
}

pub fn clash_team(region: &str, team_id: &str) -> String {
    format!("{}/lol/clash/v1/teams/{}", platform(region), team_id)
}

pub fn data_dragon_versions() -> String {
    format!("{}/api/versions.json", DATA_DRAGON_BASE)
}

pub fn data_dragon_champions(version: &str) -> String {
    format!("{}/cdn/{}/data/en_US/champion.json", DATA_DRAGON_BASE, version)
}

/// Unreserved URL characters stay as they are.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Percent-encodes a Riot ID component (spaces and non-ASCII are common).
fn encode_path(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn riot_id_components_are_encoded() {
        let url = account_by_riot_id("europe", "Hide on bush", "KR1");
        assert_eq!(
            url,
            "https://europe.api.riotgames.com/riot/account/v1/accounts/by-riot-id/Hide%20on%20bush/KR1"
        );
    }

    #[test]
    fn non_ascii_and_reserved_characters_are_escaped() {
        assert_eq!(encode_path("Ünd#a/b"), "%C3%9Cnd%23a%2Fb");
        assert_eq!(encode_path("a-b_c.d~e"), "a-b_c.d~e");
    }

    #[test]
    fn match_query_filters_are_appended() {
        let query = MatchQuery {
            count: 20,
            queue: Some(420),
            start_time: Some(1_736_000_000),
        };
        let url = match_ids("europe", "abc", &query);
        assert!(url.contains("count=20"));
        assert!(url.contains("&queue=420"));
        assert!(url.ends_with("&startTime=1736000000"));
    }

    #[test]
    fn match_count_is_capped_at_api_maximum() {
        let query = MatchQuery {
            count: 500,
            ..MatchQuery::default()
        };
        assert!(match_ids("americas", "abc", &query).contains("count=100"));
    }
}
