use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref USER_MENTION: Regex = Regex::new(r"^<@!?(\d{15,20})>$").unwrap();
    pub static ref CHANNEL_MENTION: Regex = Regex::new(r"^<#(\d{15,20})>$").unwrap();
    pub static ref ROLE_MENTION: Regex = Regex::new(r"^<@&(\d{15,20})>$").unwrap();
    pub static ref CUSTOM_EMOJI: Regex = Regex::new(r"^<(a?):(\w+):(\d{15,20})>$").unwrap();
    pub static ref SNOWFLAKE: Regex = Regex::new(r"^\d{15,20}$").unwrap();
    pub static ref MESSAGE_LINK: Regex =
        Regex::new(r"^https://(?:\w+\.)?discord(?:app)?\.com/channels/(\d{15,20}|@me)/(\d{15,20})/(\d{15,20})$")
            .unwrap();
    pub static ref NAMED_ARGUMENT: Regex =
        Regex::new(r#"([A-Za-z_][A-Za-z0-9_-]*):(?:"([^"]*)"|(\S+))"#).unwrap();
}
