use rand::Rng;
use uuid::Uuid;

/// 注册时随机分配的头像底色
pub const AVATAR_COLORS: [&str; 4] = [
    "bg-orange-500",
    "bg-blue-500",
    "bg-green-500",
    "bg-purple-500",
];

/// 生成 6 位数字短 ID，用于好友互加
pub fn generate_short_id() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:06}", n)
}

/// 从固定底色池中随机挑一个
pub fn pick_avatar_color() -> String {
    let idx = rand::thread_rng().gen_range(0..AVATAR_COLORS.len());
    AVATAR_COLORS[idx].to_string()
}

/// 操作 ID，用于日志串联一次完整调用
pub fn generate_operation_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id_is_six_digits() {
        for _ in 0..50 {
            let id = generate_short_id();
            assert_eq!(id.len(), 6);
            assert!(id.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_avatar_color_comes_from_pool() {
        for _ in 0..20 {
            let color = pick_avatar_color();
            assert!(AVATAR_COLORS.contains(&color.as_str()));
        }
    }

    #[test]
    fn test_operation_ids_are_unique() {
        let a = generate_operation_id();
        let b = generate_operation_id();
        assert_ne!(a, b);
    }
}
