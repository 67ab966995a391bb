pub mod bilibili;
pub mod douyin;
pub mod telegram;
pub mod twitter;
pub mod xiaohongshu;
pub mod youtube;
