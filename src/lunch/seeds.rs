//! 演示数据：内置好友名册、开放饭局与随机昵称池

use crate::lunch::dining::events::{EventParticipant, OpenDiningEvent};
use crate::lunch::friend::models::{Friend, FriendStatus};
use crate::lunch::types::LunchPreference;

/// 模拟好友申请时的昵称池
pub const RANDOM_NICKNAMES: [&str; 7] = [
    "干饭王",
    "碳水教父",
    "奶茶脑袋",
    "火锅战神",
    "减肥失败者",
    "随缘食客",
    "周五烧烤",
];

fn plan(
    food: &str,
    size: &str,
    time: &str,
    location: &str,
    hide_food: bool,
    hide_location: bool,
) -> LunchPreference {
    LunchPreference {
        food: food.to_string(),
        size: size.to_string(),
        time: time.to_string(),
        location: location.to_string(),
        hide_food,
        hide_location,
    }
}

fn friend(id: &str, nickname: &str, note: &str, avatar_color: &str, plan: LunchPreference) -> Friend {
    Friend {
        id: id.to_string(),
        nickname: nickname.to_string(),
        avatar_color: avatar_color.to_string(),
        short_id: String::new(),
        note: note.to_string(),
        status: FriendStatus::Active,
        lunch_plan: Some(plan),
    }
}

/// 演示模式的初始好友，四位同事都处于求约饭状态
pub fn initial_friends() -> Vec<Friend> {
    vec![
        friend(
            "1",
            "产品阿强",
            "张强-产品部",
            "bg-blue-500",
            plan("日料鳗鱼饭", "2人", "12:00", "公司楼下", false, false),
        ),
        friend(
            "2",
            "设计师小美",
            "",
            "bg-pink-500",
            plan("轻食沙拉", "随意", "12:30", "Wagas", false, false),
        ),
        friend(
            "3",
            "Java老哥",
            "李工",
            "bg-orange-500",
            plan("湘菜小炒", "3-4人", "11:50", "二楼食堂", false, false),
        ),
        friend(
            "4",
            "运营喵",
            "",
            "bg-gray-400",
            plan("麦当劳", "1人", "12:15", "公司楼下", true, true),
        ),
    ]
}

/// 演示模式的初始开放饭局：阿强和老哥的局对好友开放拼桌
pub fn initial_open_events() -> Vec<OpenDiningEvent> {
    vec![OpenDiningEvent {
        id: "ab_confirmed_table".to_string(),
        title: "产品阿强 x Java老哥 的饭局".to_string(),
        description: "A 主动邀了 B，B 偏好 2 人以上，饭局对好友开放拼桌".to_string(),
        size_preference: "3-4人".to_string(),
        food: "日料 + 湘味混搭".to_string(),
        time: "12:10".to_string(),
        location: "公司楼下 · 二楼食堂".to_string(),
        participants: vec![
            EventParticipant {
                friend_id: Some("1".to_string()),
                role: "发起人（用户A）".to_string(),
                is_self: false,
                name: None,
            },
            EventParticipant {
                friend_id: Some("3".to_string()),
                role: "确认嘉宾（用户B）".to_string(),
                is_self: false,
                name: None,
            },
        ],
        joined: false,
    }]
}
