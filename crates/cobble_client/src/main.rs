mod app;
mod camera;
mod chat;
mod entities;
mod game;
mod net;
mod player;
mod screens;
mod window;
mod world;

fn main() {
    app::run();
}
