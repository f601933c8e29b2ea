use time::OffsetDateTime;
use time::macros::format_description;

fn main() {
    // 本地时区获取失败时退回UTC
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let build_time = now
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
        .unwrap_or_else(|_| String::from("unknown"));
    println!("cargo:rustc-env=LP_BUILD_TIME={build_time}");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src");
}
