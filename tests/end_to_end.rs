use census_timelapse::animation::{Phase, YearCycleAnimator};
use census_timelapse::color::{ColorScale, RED};
use census_timelapse::config::{AppConfig, InputConfig, MunicipalityConfig};
use census_timelapse::{render, scene};
use image::RgbaImage;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

const TABLE: &str = "TERRITORIO\tMEDIDAS\tTIME_PERIOD\tOBS_VALUE\n\
                     Telde\tPOBLACION\t2015\t5000\n\
                     Telde\tPOBLACION\t2020\t80000\n\
                     Moya\tPOBLACION\t2020\t7900\n";

fn write_assets(dir: &Path) -> AppConfig {
    let map_path = dir.join("map.png");
    let tsv_path = dir.join("poblacion.tsv");
    RgbaImage::new(194, 204).save(&map_path).expect("write map");
    fs::write(&tsv_path, TABLE).expect("write table");

    let mut config: AppConfig = toml::from_str(&format!(
        "[input]\nmap_image = {:?}\npopulation_tsv = {:?}\n\n[output]\nframe_dir = {:?}\npoint_radius = 5\n",
        map_path,
        tsv_path,
        dir.join("frames"),
    ))
    .expect("config parses");
    config.municipalities = vec![
        MunicipalityConfig { name: "Telde".into(), lat: 27.992, lon: -15.405 },
        MunicipalityConfig { name: "Moya".into(), lat: 28.050, lon: -15.550 },
    ];
    config.validate().expect("config is valid");
    config
}

#[tokio::test]
async fn telde_goes_from_dark_green_to_red() {
    let dir = tempdir().expect("tempdir");
    let config = write_assets(dir.path());

    let dataset = Arc::new(scene::load_scene(&config).await.expect("scene loads"));
    assert_eq!(dataset.series.years(), &[2015, 2020]);
    assert_eq!(dataset.surface.width, 194.0);
    assert_eq!(dataset.surface.height, 204.0);

    let scale = ColorScale::from(&config.color);
    let mut animator =
        YearCycleAnimator::new(dataset, scale, config.animation.year_duration()).expect("animator");

    let first = animator.tick(Duration::ZERO).expect("first year");
    assert_eq!(first.year, 2015);
    assert_eq!(animator.colors()[0], scale.color_of(5000));
    assert_eq!(animator.overlay_text(), "2015");

    let second = animator.tick(Duration::from_millis(700)).expect("second year");
    assert_eq!(second.year, 2020);
    assert_eq!(animator.colors()[0], RED);
    assert_eq!(animator.colors()[1], scale.color_of(7900));

    animator.tick(Duration::from_millis(1400)).expect("wraps");
    assert_eq!(animator.phase(), Phase::Showing { index: 0 });
    assert_eq!(animator.overlay_text(), "2015");
}

#[tokio::test]
async fn missing_table_is_a_startup_failure() {
    let dir = tempdir().expect("tempdir");
    let mut config = write_assets(dir.path());
    config.input = InputConfig::new(dir.path().join("map.png"), dir.path().join("absent.tsv"));

    let err = scene::load_scene(&config).await.unwrap_err();
    assert!(format!("{err:#}").contains("absent.tsv"));
}

#[tokio::test]
async fn render_writes_one_frame_per_year() {
    let dir = tempdir().expect("tempdir");
    let mut config = write_assets(dir.path());
    config.output.frame_width = Some(97);

    let dataset = Arc::new(scene::load_scene(&config).await.expect("scene loads"));
    let map = image::open(&config.input.map_image).expect("map").to_rgba8();
    let mut paths = render::render_frames(&config, dataset, &map).expect("frames render");
    paths.sort();

    let names: Vec<_> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["000_2015.png", "001_2020.png"]);

    let frame = image::open(&paths[1]).expect("frame decodes").to_rgba8();
    assert_eq!((frame.width(), frame.height()), (97, 102));

    // The map is fully transparent, so any opaque ink around the centre is text.
    let centre_ink = (40..62u32)
        .flat_map(|y| (30..66u32).map(move |x| (x, y)))
        .filter(|&(x, y)| frame.get_pixel(x, y).0[3] > 0)
        .count();
    assert!(centre_ink > 0);
}

#[tokio::test]
async fn header_only_table_does_not_start_the_animation() {
    let dir = tempdir().expect("tempdir");
    let config = write_assets(dir.path());
    fs::write(&config.input.population_tsv, "TERRITORIO\tTIME_PERIOD\tOBS_VALUE\n").unwrap();

    let dataset = Arc::new(scene::load_scene(&config).await.expect("empty data still loads"));
    let result = YearCycleAnimator::new(
        dataset,
        ColorScale::from(&config.color),
        config.animation.year_duration(),
    );
    assert!(result.is_err());
}
