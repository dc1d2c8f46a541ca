//! # 内置布局
//!
//! 没有宿主导出的几何数据时使用的默认房间。

use glam::Vec3;
use room_runtime::objects::locker::{BODY, case_name};
use room_runtime::{PartSource, RoomLayout, RoomObjectKind};

fn row(names: &[&str], origin: Vec3, step: Vec3) -> Vec<PartSource> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| PartSource::new(*name, origin + step * i as f32))
        .collect()
}

/// 默认房间布局
///
/// `cases_count` 需与配置中的抽屉数量一致。
pub fn default_layout(cases_count: usize) -> RoomLayout {
    let mut layout = RoomLayout::default();
    let objects = &mut layout.objects;

    let mut locker = vec![PartSource::new(BODY, Vec3::new(-2.2, 0.9, -1.2))];
    locker.extend((0..cases_count).map(|i| {
        PartSource::new(case_name(i), Vec3::new(-2.2, 1.6 - i as f32 * 0.25, -0.95))
    }));
    objects.insert(RoomObjectKind::Locker, locker);

    objects.insert(
        RoomObjectKind::FloorLamp,
        row(&["stand", "lamp"], Vec3::new(2.4, 0.0, -1.6), Vec3::new(0.0, 1.7, 0.0)),
    );
    objects.insert(
        RoomObjectKind::Notebook,
        row(
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
            Vec3::new(0.6, 0.78, -0.7),
            Vec3::new(0.0, 0.04, 0.0),
        ),
    );
    objects.insert(
        RoomObjectKind::Keyboard,
        row(&["base"], Vec3::new(0.0, 0.78, -0.3), Vec3::ZERO),
    );
    objects.insert(
        RoomObjectKind::Mouse,
        row(
            &["mouse_body", "mouse_left_key"],
            Vec3::new(0.45, 0.78, -0.3),
            Vec3::new(0.0, 0.01, -0.03),
        ),
    );
    objects.insert(
        RoomObjectKind::Window,
        row(
            &["window_frame", "window", "window_handle"],
            Vec3::new(0.0, 1.6, -2.0),
            Vec3::new(0.0, 0.0, 0.02),
        ),
    );
    objects.insert(
        RoomObjectKind::AirConditioner,
        row(
            &["air_conditioner_body", "air_conditioner_door"],
            Vec3::new(1.4, 2.4, -1.9),
            Vec3::new(0.0, -0.12, 0.1),
        ),
    );

    layout
}
