fn main() {
    // ESP-IDF linker properties are only meaningful when cross-compiling for
    // the device; host builds (unit tests, simulator) have no IDF environment.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}
