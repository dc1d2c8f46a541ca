//! # 房间交互集成测试
//!
//! 测试 `Room` 的构造、展示顺序、指针路由、描边与音量广播。

use glam::Vec3;
use room_runtime::{
    Hit, ObjectSoundConfig, OpenState, PartSource, PointerInput, PowerState, Room, RoomConfig,
    RoomError, RoomEvent, RoomLayout, RoomObjectKind, VirtualAudio,
};

fn parts(names: &[&str], origin: Vec3) -> Vec<PartSource> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| PartSource::new(*name, origin + Vec3::new(0.0, i as f32 * 0.1, 0.0)))
        .collect()
}

/// 包含全部对象的布局
fn full_layout() -> RoomLayout {
    let mut layout = RoomLayout::default();
    let objects = &mut layout.objects;

    let mut locker = vec![PartSource::new("body", Vec3::new(-2.0, 1.0, 0.0))];
    locker.extend((1..=6).map(|i| {
        PartSource::new(format!("case{i:02}"), Vec3::new(-2.0, 2.0 - i as f32 * 0.3, 0.0))
    }));
    objects.insert(RoomObjectKind::Locker, locker);
    objects.insert(
        RoomObjectKind::FloorLamp,
        parts(&["stand", "lamp"], Vec3::new(2.0, 0.0, -1.0)),
    );
    objects.insert(
        RoomObjectKind::Notebook,
        parts(
            &[
                "notebook_stand",
                "notebook_mount",
                "notebook_arm_mount_base",
                "notebook_arm_mount_arm01",
                "notebook_arm_mount_arm02",
                "notebook_keyboard",
                "notebook_monitor",
                "notebook_screen",
            ],
            Vec3::new(0.5, 0.8, -0.5),
        ),
    );
    objects.insert(
        RoomObjectKind::Keyboard,
        parts(&["base"], Vec3::new(0.0, 0.8, 0.0)),
    );
    objects.insert(
        RoomObjectKind::Mouse,
        parts(&["mouse_body", "mouse_left_key"], Vec3::new(0.4, 0.8, 0.0)),
    );
    objects.insert(
        RoomObjectKind::Window,
        parts(&["window_frame", "window", "window_handle"], Vec3::new(0.0, 1.5, -3.0)),
    );
    objects.insert(
        RoomObjectKind::AirConditioner,
        parts(
            &["air_conditioner_body", "air_conditioner_door"],
            Vec3::new(0.0, 2.5, -3.0),
        ),
    );
    layout
}

fn room(config: &RoomConfig) -> (Room, VirtualAudio) {
    let audio = VirtualAudio::new();
    let mut backend = audio.clone();
    let room = Room::new(&full_layout(), config, &mut backend).unwrap();
    (room, audio)
}

fn run(room: &mut Room, seconds: f32) -> Vec<RoomEvent> {
    let frames = (seconds / 0.05).round() as usize;
    (0..frames).flat_map(|_| room.update(0.05)).collect()
}

/// 屏幕左半边是柜子，右半边什么都没有
fn locker_picker(x: f32, y: f32) -> Option<Hit> {
    if x >= 100.0 {
        return None;
    }
    let part = if y < 20.0 {
        "body".to_string()
    } else {
        format!("case{:02}", (y / 20.0) as usize)
    };
    Some(Hit {
        object: RoomObjectKind::Locker,
        part,
    })
}

/// 构造时按展示顺序创建所有对象
#[test]
fn test_room_creates_objects_in_show_order() {
    let (room, audio) = room(&RoomConfig::default());

    assert_eq!(room.kinds(), RoomObjectKind::ALL.to_vec());
    // 柜子 6 对、空调 1 对
    assert_eq!(audio.created(), 14);
    assert!(room.object(RoomObjectKind::Locker).unwrap().sounds().is_some());
    assert!(room.object(RoomObjectKind::FloorLamp).unwrap().sounds().is_none());
}

/// 缺少零件时构造失败
#[test]
fn test_missing_part_is_a_configuration_error() {
    let mut layout = full_layout();
    layout
        .objects
        .get_mut(&RoomObjectKind::Locker)
        .unwrap()
        .retain(|p| p.name != "case03");

    let result = Room::new(&layout, &RoomConfig::default(), &mut VirtualAudio::new());
    assert!(matches!(result, Err(RoomError::MissingPart { part, .. }) if part == "case03"));
}

/// 缺少音效时构造失败
#[test]
fn test_missing_sound_is_a_configuration_error() {
    let mut audio = VirtualAudio::with_clips(["open-case", "air-conditioner-on", "air-conditioner-off"]);

    let result = Room::new(&full_layout(), &RoomConfig::default(), &mut audio);
    assert!(matches!(result, Err(RoomError::MissingSound { clip, .. }) if clip == "close-case"));
}

/// 无效配置在构造时被拒绝
#[test]
fn test_invalid_config_rejected() {
    let mut config = RoomConfig::default();
    config.locker.case_move_speed = 0.0;

    let result = Room::new(&full_layout(), &config, &mut VirtualAudio::new());
    assert!(matches!(result, Err(RoomError::Config(_))));
}

/// 展示动画：每个对象恰好完成一次，完成前不可交互
#[test]
fn test_show_completes_every_object_once() {
    let (mut room, _audio) = room(&RoomConfig::default());

    // 1. 开始展示
    room.show();
    for kind in room.kinds() {
        assert!(!room.object(kind).unwrap().is_input_enabled());
    }

    // 2. 展示期间点击被忽略
    room.click(RoomObjectKind::Locker, "case01").unwrap();

    // 3. 等待所有动画结束
    let events = run(&mut room, 4.0);
    let mut completed: Vec<RoomObjectKind> = events
        .iter()
        .filter_map(|e| match e {
            RoomEvent::ShowAnimationComplete { kind } => Some(*kind),
            _ => None,
        })
        .collect();
    completed.sort();

    let mut expected = RoomObjectKind::ALL.to_vec();
    expected.sort();
    assert_eq!(completed, expected);
    assert!(!events.iter().any(|e| matches!(e, RoomEvent::CaseStateChanged { .. })));

    // 4. 恢复交互，零件回到原位
    for kind in room.kinds() {
        let object = room.object(kind).unwrap();
        assert!(object.is_input_enabled());
        assert!(object.debug_menu().is_enabled());
        for part in object.parts().iter() {
            assert!(part.visible);
            assert!((part.transform.position.y - part.start.position.y).abs() < 1e-4);
        }
    }
}

/// 按下与抬起位置接近：视为点击
#[test]
fn test_pointer_click_opens_case() {
    let (mut room, _audio) = room(&RoomConfig::default());

    room.on_pointer(PointerInput::Down { x: 10.0, y: 45.0 }, &locker_picker);
    room.on_pointer(PointerInput::Up { x: 12.0, y: 46.0 }, &locker_picker);

    let events = room.update(0.05);
    assert_eq!(
        events,
        vec![RoomEvent::CaseStateChanged {
            case: 1,
            state: OpenState::Moving,
        }]
    );
}

/// 按下与抬起位移超过阈值：视为拖拽
#[test]
fn test_pointer_drag_is_not_a_click() {
    let (mut room, _audio) = room(&RoomConfig::default());

    room.on_pointer(PointerInput::Down { x: 10.0, y: 45.0 }, &locker_picker);
    room.on_pointer(PointerInput::Up { x: 30.0, y: 45.0 }, &locker_picker);
    // 没有按下就抬起
    room.on_pointer(PointerInput::Up { x: 10.0, y: 45.0 }, &locker_picker);

    assert!(run(&mut room, 1.0).is_empty());
}

/// 点击空白处或离开画布不产生事件
#[test]
fn test_pointer_miss_and_leave() {
    let (mut room, _audio) = room(&RoomConfig::default());

    room.on_pointer(PointerInput::Down { x: 150.0, y: 45.0 }, &locker_picker);
    room.on_pointer(PointerInput::Up { x: 150.0, y: 45.0 }, &locker_picker);

    room.on_pointer(PointerInput::Down { x: 10.0, y: 45.0 }, &locker_picker);
    room.on_pointer(PointerInput::Leave, &locker_picker);
    room.on_pointer(PointerInput::Up { x: 10.0, y: 45.0 }, &locker_picker);

    assert!(run(&mut room, 1.0).is_empty());
}

/// 悬停描边：柜体描整个柜子，抽屉只描自己
#[test]
fn test_hover_outline() {
    let (mut room, _audio) = room(&RoomConfig::default());

    room.on_pointer(PointerInput::Move { x: 10.0, y: 5.0 }, &locker_picker);
    let outline = room.outline().unwrap();
    assert_eq!(outline.object, RoomObjectKind::Locker);
    assert_eq!(outline.parts.len(), 7);

    room.on_pointer(PointerInput::Move { x: 10.0, y: 65.0 }, &locker_picker);
    assert_eq!(room.outline().unwrap().parts.len(), 1);

    room.on_pointer(PointerInput::Move { x: 150.0, y: 65.0 }, &locker_picker);
    assert!(room.outline().is_none());

    room.on_pointer(PointerInput::Move { x: 10.0, y: 5.0 }, &locker_picker);
    room.on_pointer(PointerInput::Leave, &locker_picker);
    assert!(room.outline().is_none());
}

/// 不可交互的零件与展示中的对象不描边
#[test]
fn test_no_outline_for_inactive_or_revealing() {
    let (mut room, _audio) = room(&RoomConfig::default());
    let frame = |_x: f32, _y: f32| {
        Some(Hit {
            object: RoomObjectKind::Window,
            part: "window_frame".to_string(),
        })
    };

    room.on_pointer(PointerInput::Move { x: 0.0, y: 0.0 }, &frame);
    assert!(room.outline().is_none());

    room.show();
    room.on_pointer(PointerInput::Move { x: 10.0, y: 5.0 }, &locker_picker);
    assert!(room.outline().is_none());
}

/// 全局音量广播：实际音量 = 全局音量 × 对象音量，禁用时为 0
#[test]
fn test_volume_broadcast() {
    let mut config = RoomConfig::default();
    config.sounds.objects.insert(
        RoomObjectKind::Locker,
        ObjectSoundConfig {
            volume: 0.8,
            ..ObjectSoundConfig::default()
        },
    );
    let (mut room, _audio) = room(&config);

    room.set_global_volume(0.5);
    room.enable_sound();
    let volumes = |room: &Room, kind| {
        room.object(kind).unwrap().sounds().unwrap().volumes()
    };
    assert!(volumes(&room, RoomObjectKind::Locker).iter().all(|v| (v - 0.4).abs() < 1e-6));
    assert!(volumes(&room, RoomObjectKind::AirConditioner).iter().all(|v| (v - 0.5).abs() < 1e-6));

    room.disable_sound();
    assert!(!room.is_sound_enabled());
    assert!(volumes(&room, RoomObjectKind::Locker).iter().all(|v| *v == 0.0));

    // 禁用期间修改音量，启用后生效
    room.set_global_volume(2.0);
    assert_eq!(room.global_volume(), 1.0);
    assert!(volumes(&room, RoomObjectKind::Locker).iter().all(|v| *v == 0.0));
    room.enable_sound();
    assert!(volumes(&room, RoomObjectKind::Locker).iter().all(|v| (v - 0.8).abs() < 1e-6));
}

/// 调试标记随房间开关
#[test]
fn test_sound_helpers() {
    let (mut room, _audio) = room(&RoomConfig::default());
    let visible = |room: &Room| {
        room.object(RoomObjectKind::Locker)
            .unwrap()
            .sounds()
            .unwrap()
            .helpers()
            .filter(|h| h.visible)
            .count()
    };

    assert_eq!(visible(&room), 0);
    room.show_sound_helpers();
    assert_eq!(visible(&room), 6);
    room.hide_sound_helpers();
    assert_eq!(visible(&room), 0);
}

/// 按名称点击：未知对象报错，未知零件忽略
#[test]
fn test_click_by_name() {
    let mut layout = full_layout();
    layout.objects.remove(&RoomObjectKind::Mouse);
    let mut room = Room::new(&layout, &RoomConfig::default(), &mut VirtualAudio::new()).unwrap();

    assert!(matches!(
        room.click(RoomObjectKind::Mouse, "mouse_body"),
        Err(RoomError::UnknownObject { .. })
    ));
    room.click(RoomObjectKind::Locker, "case99").unwrap();
    assert!(room.update(0.05).is_empty());

    room.click(RoomObjectKind::Keyboard, "base").unwrap();
    assert_eq!(room.update(0.05), vec![RoomEvent::KeyPressed]);
}

/// 空调：点击切换电源并播放音效
#[test]
fn test_air_conditioner_click() {
    let (mut room, audio) = room(&RoomConfig::default());

    room.click(RoomObjectKind::AirConditioner, "air_conditioner_door").unwrap();
    let events = run(&mut room, 1.0);

    assert!(events.iter().any(|e| matches!(
        e,
        RoomEvent::AirConditionerStateChanged {
            power: PowerState::On,
            ..
        }
    )));
    assert_eq!(audio.play_counts().get("air-conditioner-on"), Some(&1));
}

/// 调试面板与点击走同一条命令路径
#[test]
fn test_debug_menu_through_room() {
    let (mut room, _audio) = room(&RoomConfig::default());

    let locker = room.object_mut(RoomObjectKind::Locker).unwrap();
    assert!(locker.debug_menu_mut().press("Push case 6"));

    let events = room.update(0.05);
    assert_eq!(
        events,
        vec![RoomEvent::CaseStateChanged {
            case: 5,
            state: OpenState::Moving,
        }]
    );
}
