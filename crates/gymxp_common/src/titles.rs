//! Humorous titles shown next to the level, one per level from Lv1.

pub const TITLES: [&str; 50] = [
    "筋トレ見習い",
    "初級プロテイン飲み",
    "追い込みビギナー",
    "セット職人",
    "高重量の志願者",
    "ルーティン守護者",
    "意識高い系マッスル",
    "ジムの住人",
    "上腕二頭筋の語り部",
    "筋肉痛の虜",
    "部位分割の伝達者",
    "追い込みの求道者",
    "インクラインの探究者",
    "フォーム警察",
    "筋肥大の探求者",
    "ストリクトの賢者",
    "ボディメイクの革命児",
    "減量期の鬼",
    "管理人",
    "増量期の化身",
    "高タンパクの伝道師",
    "魔術師",
    "錬金術師",
    "ホエイ界の審査員",
    "筋肉の哲学者",
    "フォーム錬成の達人",
    "爆伸びの旅人",
    "パンプの召喚士",
    "ドロップセットの覇者",
    "スーパーセットの舞姫",
    "可動域の吟遊詩人",
    "効かせの吟味者",
    "セット間の賢者",
    "筋線維の支配者",
    "高密度ボディの錬成者",
    "マシン支配の覇者",
    "鍛錬の求道者",
    "レップの魔術師",
    "筋肉構築の建築士",
    "重量との対話者",
    "限界突破の戦士",
    "鉄と汗の預言者",
    "ウェイトの賢者",
    "トレーニングの巨人",
    "肉体改造の伝説",
    "筋力の守護者",
    "鍛錬界の革命児",
    "成長記録の伝道師",
    "セット回数の覇王",
    "筋帝王",
];

/// Title for a level. Levels past the catalog keep the last title.
pub fn title_for(level: u32) -> &'static str {
    let index = (level.saturating_sub(1) as usize).min(TITLES.len() - 1);
    TITLES[index]
}
