//! Seed data: the default rank table and a tiny built-in poem corpus.

use std::collections::HashMap;

use crate::domain::{Language, Poem, PoemSentence, RankTier, TranslatedPoem};

/// Highest score a non-paying account can reach.
pub const FREE_MAX_SCORE: u32 = 25;

/// The 11 academic ranks, lowest first.
pub fn seed_rank_tiers() -> Vec<RankTier> {
  let rows: [(&str, &str, &str, &str, u32, Option<u32>, bool); 11] = [
    ("baiDing", "白丁", "初学者，刚开始学习唐诗", "📚", 0, Some(10), false),
    ("xueTong", "学童", "已掌握基础诗句，继续努力", "🎓", 11, Some(25), false),
    ("xiuCai", "秀才", "免费用户的最高等级", "📜", 26, Some(45), false),
    ("linSheng", "廪生", "需要付费解锁", "🖋️", 46, Some(70), true),
    ("gongSheng", "贡生", "需要付费解锁", "📖", 71, Some(100), true),
    ("juRen", "举人", "需要付费解锁", "🏆", 101, Some(135), true),
    ("gongShi", "贡士", "需要付费解锁", "🎭", 136, Some(175), true),
    ("jinShi", "进士", "需要付费解锁", "👑", 176, Some(220), true),
    ("tanHua", "探花", "需要付费解锁", "🌸", 221, Some(280), true),
    ("bangYan", "榜眼", "需要付费解锁", "💎", 281, Some(340), true),
    ("zhuangYuan", "状元", "最高等级，需要付费解锁", "🥇", 341, None, true),
  ];
  rows
    .into_iter()
    .map(|(key, name, description, emoji, min_score, max_score, requires_premium)| RankTier {
      key: key.into(),
      name: name.into(),
      description: description.into(),
      emoji: emoji.into(),
      min_score,
      max_score,
      requires_premium,
    })
    .collect()
}

fn lines(items: &[&str]) -> Vec<PoemSentence> {
  items
    .iter()
    .enumerate()
    .map(|(i, s)| PoemSentence { senid: i as u32, content: (*s).to_string() })
    .collect()
}

/// Minimal corpus so the quiz works without `POEM_DATA_DIR`.
pub fn seed_poems() -> Vec<Poem> {
  let raw: [(&str, &str, &str, [&str; 4]); 6] = [
    ("1", "静夜思", "李白", ["床前明月光", "疑是地上霜", "举头望明月", "低头思故乡"]),
    ("2", "春晓", "孟浩然", ["春眠不觉晓", "处处闻啼鸟", "夜来风雨声", "花落知多少"]),
    ("3", "相思", "王维", ["红豆生南国", "春来发几枝", "愿君多采撷", "此物最相思"]),
    ("4", "登鹳雀楼", "王之涣", ["白日依山尽", "黄河入海流", "欲穷千里目", "更上一层楼"]),
    ("5", "江雪", "柳宗元", ["千山鸟飞绝", "万径人踪灭", "孤舟蓑笠翁", "独钓寒江雪"]),
    ("6", "登乐游原", "李商隐", ["向晚意不适", "驱车登古原", "夕阳无限好", "只是近黄昏"]),
  ];
  raw
    .iter()
    .map(|(id, title, author, body)| Poem {
      id: (*id).into(),
      title: (*title).into(),
      author: (*author).into(),
      sentence: lines(body),
    })
    .collect()
}

/// English translations for the seed corpus.
pub fn seed_translations() -> HashMap<Language, Vec<TranslatedPoem>> {
  let raw: [(&str, &str, [&str; 4]); 6] = [
    ("1", "Quiet Night Thoughts", [
      "Before my bed the moonlight glows",
      "I wonder if it's frost on the ground",
      "I raise my head to gaze at the bright moon",
      "I lower it and think of home",
    ]),
    ("2", "Spring Morning", [
      "Asleep in spring, I miss the dawn",
      "Everywhere I hear birds singing",
      "Last night came the sound of wind and rain",
      "How many blossoms have fallen?",
    ]),
    ("3", "Longing", [
      "Red beans grow in the southern land",
      "In spring they put out a few new sprigs",
      "I hope you will gather many of them",
      "These things best stir longing",
    ]),
    ("4", "On the Stork Tower", [
      "The white sun sets behind the mountains",
      "The Yellow River flows into the sea",
      "To see a thousand miles further",
      "Climb one more storey",
    ]),
    ("5", "River Snow", [
      "Over a thousand hills no bird flies",
      "On ten thousand paths no footprints",
      "A lone boat, an old man in straw cape",
      "Fishing alone in the cold river snow",
    ]),
    ("6", "On the Leyou Plateau", [
      "Toward evening my mood is unsettled",
      "I drive my carriage up the ancient plain",
      "The setting sun is infinitely fine",
      "Only it is so near to dusk",
    ]),
  ];
  let english = raw
    .iter()
    .map(|(id, title, body)| TranslatedPoem {
      id: (*id).into(),
      title: Some((*title).into()),
      author: None,
      sentence: lines(body),
    })
    .collect();
  HashMap::from([(Language::English, english)])
}
